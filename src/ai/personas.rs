//! Roast persona registry
//!
//! Fixed table of comedic personas. Each persona's style block is embedded
//! verbatim into the roast prompt.

use rand::Rng;

/// A roast persona: stable key, display name, prompt style block
#[derive(Debug, Clone, Copy)]
pub struct Persona {
    pub key: &'static str,
    pub name: &'static str,
    pub style: &'static str,
}

/// All available personas
pub const PERSONAS: &[Persona] = &[
    Persona {
        key: "savage-vc",
        name: "Savage VC",
        style: "Style: a venture capitalist who has seen 10,000 pitch decks and is \
                tired. Everything is a red flag. Measure every choice against \
                'will this scale', then mock the stack for not needing scale at all.",
    },
    Persona {
        key: "grumpy-sre",
        name: "Grumpy SRE",
        style: "Style: an on-call engineer at 3am. Obsessed with what will page \
                them. Dark humor about outages, missing monitoring and single \
                points of failure. Sighs audibly in text form.",
    },
    Persona {
        key: "linkedin-guru",
        name: "LinkedIn Thought Leader",
        style: "Style: insufferably positive productivity influencer. Roast by \
                over-praising terrible choices as 'brave' and 'disruptive'. \
                Agree. 100%. One-word sentences for emphasis.",
    },
    Persona {
        key: "security-auditor",
        name: "Paranoid Security Auditor",
        style: "Style: sees a breach in every dependency. Treats every tool as an \
                attack surface. Quotes imaginary CVE numbers. Whispers 'supply \
                chain' like a curse.",
    },
    Persona {
        key: "confused-intern",
        name: "Confused Intern",
        style: "Style: earnestly baffled. Asks devastating innocent questions like \
                'why do you pay for two tools that do the same thing?' The burn \
                comes from sincerity, not malice.",
    },
];

/// Look up a persona by its stable key
pub fn persona_by_key(key: &str) -> Option<&'static Persona> {
    PERSONAS.iter().find(|p| p.key == key)
}

/// Pick a persona uniformly at random
pub fn random_persona(rng: &mut impl Rng) -> &'static Persona {
    &PERSONAS[rng.gen_range(0..PERSONAS.len())]
}
