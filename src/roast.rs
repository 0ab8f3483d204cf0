//! Roast generation
//!
//! Orchestrates persona selection, prompt building, the gateway call
//! (buffered or streaming) and the burn-score heuristic. The score is
//! deliberately not a second AI call; doubling latency and cost for a
//! number nobody audits would be silly.

use anyhow::{Result, bail};
use rand::Rng;

use crate::ai::builders::roast_prompt;
use crate::ai::gateway::ProviderGateway;
use crate::ai::personas::{Persona, persona_by_key, random_persona};
use crate::ai::stream::{REPLAY_DELAY, replay_words};
use crate::ai::types::{GenerationOptions, RoastResult};
use crate::models::ToolRef;

/// Keywords that earn a roast extra heat
pub const SPICY_WORDS: &[&str] = &[
    "bold",
    "brave",
    "yikes",
    "oof",
    "ancient",
    "dinosaur",
    "cursed",
    "crime",
    "chaos",
    "tragic",
    "audacity",
    "bless",
    "legacy",
    "regret",
];

/// Compute the burn score for a roast text, jitter supplied by the caller
///
/// Base 50, up to 10 for length, 5 per distinct tool mentioned (cap 20),
/// 3 per spicy-keyword occurrence, 4 per question mark (cap 12), plus the
/// jitter term, clamped to [0, 100].
pub fn burn_score(text: &str, tools: &[ToolRef], jitter: i32) -> u8 {
    let mut score: i32 = 50;

    let words = text.split_whitespace().count();
    score += match words {
        0..=99 => 0,
        100..=199 => 5,
        _ => 10,
    };

    let lower = text.to_lowercase();

    let mentions = tools
        .iter()
        .filter(|t| !t.name.is_empty() && lower.contains(&t.name.to_lowercase()))
        .count();
    score += (mentions as i32 * 5).min(20);

    let spicy: usize = SPICY_WORDS.iter().map(|w| lower.matches(w).count()).sum();
    score += spicy as i32 * 3;

    let questions = text.chars().filter(|c| *c == '?').count();
    score += (questions as i32 * 4).min(12);

    score += jitter;
    score.clamp(0, 100) as u8
}

/// Burn score with the jitter term drawn from an RNG (±5)
///
/// The jitter is a designed characteristic, not noise to eliminate: no two
/// roasts of the same stack score identically. Tests pin it through the
/// injected RNG or call [`burn_score`] directly.
pub fn burn_score_with_rng(text: &str, tools: &[ToolRef], rng: &mut impl Rng) -> u8 {
    burn_score(text, tools, rng.gen_range(-5..=5))
}

/// Roast generator over a provider gateway
pub struct RoastGenerator<'a> {
    gateway: &'a ProviderGateway,
}

impl<'a> RoastGenerator<'a> {
    pub fn new(gateway: &'a ProviderGateway) -> Self {
        Self { gateway }
    }

    fn resolve_persona(&self, persona_key: Option<&str>) -> Result<&'static Persona> {
        match persona_key {
            Some(key) => match persona_by_key(key) {
                Some(persona) => Ok(persona),
                None => bail!("Unknown persona '{}'. Run 'stackroast personas' to list them.", key),
            },
            None => Ok(random_persona(&mut rand::thread_rng())),
        }
    }

    fn package(&self, text: &str, tools: &[ToolRef], persona: &Persona) -> RoastResult {
        RoastResult {
            roast_text: text.trim().to_string(),
            burn_score: burn_score_with_rng(text, tools, &mut rand::thread_rng()),
            persona_name: persona.name.to_string(),
            persona_key: persona.key.to_string(),
        }
    }

    /// Generate a roast with a buffered gateway call
    pub fn generate(
        &self,
        stack_name: &str,
        tools: &[ToolRef],
        persona_key: Option<&str>,
    ) -> Result<RoastResult> {
        let persona = self.resolve_persona(persona_key)?;
        let prompt = roast_prompt(stack_name, tools, persona);

        let result = self.gateway.generate(&prompt, &GenerationOptions::prose())?;
        Ok(self.package(&result.text, tools, persona))
    }

    /// Generate a roast, forwarding chunks as they arrive
    ///
    /// `on_chunk` receives each chunk plus the accumulated text so far. When
    /// real streaming fails (or the primary cannot stream), the generation
    /// transparently falls back to a buffered call replayed word-by-word, so
    /// the caller's progressive reveal behaves identically on both paths.
    /// No cancellation: once started, a generation runs to completion or
    /// failure.
    pub fn generate_streaming(
        &self,
        stack_name: &str,
        tools: &[ToolRef],
        persona_key: Option<&str>,
        on_chunk: &mut dyn FnMut(&str, &str),
    ) -> Result<RoastResult> {
        let persona = self.resolve_persona(persona_key)?;
        let prompt = roast_prompt(stack_name, tools, persona);
        let options = GenerationOptions::prose();

        let mut accumulated = String::new();

        if self.gateway.supports_streaming() {
            let streamed = self.gateway.stream_primary(&prompt, &options, &mut |chunk| {
                accumulated.push_str(chunk);
                on_chunk(chunk, &accumulated);
            });
            if let Ok(full) = streamed {
                return Ok(self.package(&full, tools, persona));
            }
            // Stream failed partway; start the reveal over from the
            // buffered fallback below
            accumulated.clear();
        }

        let result = self.gateway.generate(&prompt, &options)?;
        replay_words(&result.text, REPLAY_DELAY, &mut |chunk| {
            accumulated.push_str(chunk);
            on_chunk(chunk, &accumulated);
        });

        Ok(self.package(&result.text, tools, persona))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::gateway::{ProviderGateway, TextProvider};

    fn tools(names: &[&str]) -> Vec<ToolRef> {
        names.iter().map(|n| ToolRef::new(n)).collect()
    }

    struct FixedProvider {
        text: String,
        streaming: bool,
    }

    impl TextProvider for FixedProvider {
        fn generate(&self, _prompt: &str, _options: &GenerationOptions) -> Result<String> {
            Ok(self.text.clone())
        }

        fn supports_streaming(&self) -> bool {
            self.streaming
        }

        fn generate_streaming(
            &self,
            _prompt: &str,
            _options: &GenerationOptions,
            on_chunk: &mut dyn FnMut(&str),
        ) -> Result<String> {
            if !self.streaming {
                bail!("no streaming");
            }
            for chunk in self.text.split_inclusive(' ') {
                on_chunk(chunk);
            }
            Ok(self.text.clone())
        }
    }

    struct BrokenStreamProvider {
        text: String,
    }

    impl TextProvider for BrokenStreamProvider {
        fn generate(&self, _prompt: &str, _options: &GenerationOptions) -> Result<String> {
            Ok(self.text.clone())
        }

        fn supports_streaming(&self) -> bool {
            true
        }

        fn generate_streaming(
            &self,
            _prompt: &str,
            _options: &GenerationOptions,
            on_chunk: &mut dyn FnMut(&str),
        ) -> Result<String> {
            on_chunk("partial ");
            bail!("stream dropped")
        }
    }

    #[test]
    fn test_burn_score_bounds() {
        let stack = tools(&["MongoDB", "jQuery"]);

        assert!(burn_score("", &stack, 0) <= 100);
        assert_eq!(burn_score("", &stack, -100), 0);

        let long = "bold? ".repeat(500);
        assert_eq!(burn_score(&long, &stack, 100), 100);
    }

    #[test]
    fn test_burn_score_scenario() {
        // 9 words, 2 tool mentions, 2 "bold" hits, 2 question marks:
        // 50 + 0 + 10 + 6 + 8 = 74
        let stack = tools(&["MongoDB", "jQuery"]);
        let text = "MongoDB and jQuery in 2025? Bold. Bold choice indeed?";
        assert_eq!(burn_score(text, &stack, 0), 74);
    }

    #[test]
    fn test_burn_score_jitter_band() {
        use rand::SeedableRng;
        use rand::rngs::StdRng;

        let stack = tools(&["MongoDB", "jQuery"]);
        let text = "MongoDB and jQuery in 2025? Bold. Bold choice indeed?";

        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let score = burn_score_with_rng(text, &stack, &mut rng);
            assert!((69..=79).contains(&score));
        }
    }

    #[test]
    fn test_burn_score_mention_monotonicity() {
        let stack = tools(&["MongoDB", "jQuery", "Redis"]);

        let fewer = "This stack mentions MongoDB only.";
        let more = "This stack mentions MongoDB only. Also jQuery and Redis.";
        assert!(burn_score(more, &stack, 0) >= burn_score(fewer, &stack, 0));
    }

    #[test]
    fn test_burn_score_mention_cap() {
        let stack = tools(&["a1", "b2", "c3", "d4", "e5", "f6"]);
        // 6 mentions would be 30 points uncapped; cap holds it at 20
        let text = "a1 b2 c3 d4 e5 f6";
        assert_eq!(burn_score(text, &stack, 0), 70);
    }

    #[test]
    fn test_generate_uses_gateway_text() {
        let gateway = ProviderGateway::with_providers(
            Some(Box::new(FixedProvider {
                text: "Your stack is a crime scene?".into(),
                streaming: false,
            })),
            None,
        );
        let generator = RoastGenerator::new(&gateway);

        let result = generator
            .generate("My Stack", &tools(&["MongoDB"]), Some("grumpy-sre"))
            .unwrap();
        assert_eq!(result.roast_text, "Your stack is a crime scene?");
        assert_eq!(result.persona_key, "grumpy-sre");
        assert!(result.burn_score <= 100);
    }

    #[test]
    fn test_generate_unknown_persona() {
        let gateway = ProviderGateway::with_providers(
            Some(Box::new(FixedProvider {
                text: "x".into(),
                streaming: false,
            })),
            None,
        );
        let generator = RoastGenerator::new(&gateway);

        let err = generator
            .generate("My Stack", &[], Some("no-such-persona"))
            .unwrap_err();
        assert!(err.to_string().contains("Unknown persona"));
    }

    #[test]
    fn test_streaming_accumulates_chunks() {
        let gateway = ProviderGateway::with_providers(
            Some(Box::new(FixedProvider {
                text: "bold choice my friend".into(),
                streaming: true,
            })),
            None,
        );
        let generator = RoastGenerator::new(&gateway);

        let mut last_accumulated = String::new();
        let mut chunks = 0;
        let result = generator
            .generate_streaming("My Stack", &[], Some("savage-vc"), &mut |_, acc| {
                last_accumulated = acc.to_string();
                chunks += 1;
            })
            .unwrap();

        assert!(chunks > 1);
        assert_eq!(last_accumulated, "bold choice my friend");
        assert_eq!(result.roast_text, "bold choice my friend");
    }

    #[test]
    fn test_streaming_falls_back_to_replay() {
        let gateway = ProviderGateway::with_providers(
            Some(Box::new(BrokenStreamProvider {
                text: "replayed roast text".into(),
            })),
            None,
        );
        let generator = RoastGenerator::new(&gateway);

        let mut collected = String::new();
        let result = generator
            .generate_streaming("My Stack", &[], Some("savage-vc"), &mut |chunk, _| {
                collected.push_str(chunk);
            })
            .unwrap();

        // The broken stream emitted one chunk before dying; the replay then
        // delivers the full buffered text from the start
        assert_eq!(collected, "partial replayed roast text");
        assert_eq!(result.roast_text, "replayed roast text");
    }
}
