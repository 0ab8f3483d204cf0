//! Starter catalog data
//!
//! A seed of well-known SaaS tools so alternatives reconciliation has
//! something to match against on a fresh install.

use anyhow::Result;

use crate::models::CatalogTool;

use super::Database;

/// One row of the embedded starter catalog
pub struct SeedTool {
    pub name: &'static str,
    pub category: &'static str,
    pub description: &'static str,
    pub monthly_price: f64,
    pub website: &'static str,
}

/// Well-known tools shipped with the binary, all pre-approved
pub const STARTER_CATALOG: &[SeedTool] = &[
    SeedTool {
        name: "Supabase",
        category: "database",
        description: "Open source Firebase alternative with Postgres",
        monthly_price: 25.0,
        website: "https://supabase.com",
    },
    SeedTool {
        name: "MongoDB Atlas",
        category: "database",
        description: "Managed MongoDB clusters",
        monthly_price: 57.0,
        website: "https://mongodb.com/atlas",
    },
    SeedTool {
        name: "PlanetScale",
        category: "database",
        description: "Serverless MySQL platform",
        monthly_price: 39.0,
        website: "https://planetscale.com",
    },
    SeedTool {
        name: "Neon",
        category: "database",
        description: "Serverless Postgres with branching",
        monthly_price: 19.0,
        website: "https://neon.tech",
    },
    SeedTool {
        name: "Auth0",
        category: "auth",
        description: "Hosted authentication and authorization",
        monthly_price: 35.0,
        website: "https://auth0.com",
    },
    SeedTool {
        name: "Clerk",
        category: "auth",
        description: "Drop-in user management and auth components",
        monthly_price: 25.0,
        website: "https://clerk.com",
    },
    SeedTool {
        name: "Stripe",
        category: "payments",
        description: "Payments infrastructure",
        monthly_price: 0.0,
        website: "https://stripe.com",
    },
    SeedTool {
        name: "Paddle",
        category: "payments",
        description: "Merchant of record for SaaS billing",
        monthly_price: 0.0,
        website: "https://paddle.com",
    },
    SeedTool {
        name: "Vercel",
        category: "hosting",
        description: "Frontend cloud with edge deployments",
        monthly_price: 20.0,
        website: "https://vercel.com",
    },
    SeedTool {
        name: "Netlify",
        category: "hosting",
        description: "Web hosting with serverless functions",
        monthly_price: 19.0,
        website: "https://netlify.com",
    },
    SeedTool {
        name: "Railway",
        category: "hosting",
        description: "Infrastructure platform for full-stack apps",
        monthly_price: 5.0,
        website: "https://railway.app",
    },
    SeedTool {
        name: "Fly.io",
        category: "hosting",
        description: "Run apps close to users on Fly machines",
        monthly_price: 5.0,
        website: "https://fly.io",
    },
    SeedTool {
        name: "Mixpanel",
        category: "analytics",
        description: "Product analytics with funnels and cohorts",
        monthly_price: 28.0,
        website: "https://mixpanel.com",
    },
    SeedTool {
        name: "PostHog",
        category: "analytics",
        description: "Open source product analytics suite",
        monthly_price: 0.0,
        website: "https://posthog.com",
    },
    SeedTool {
        name: "Plausible",
        category: "analytics",
        description: "Privacy-friendly web analytics",
        monthly_price: 9.0,
        website: "https://plausible.io",
    },
    SeedTool {
        name: "SendGrid",
        category: "email",
        description: "Transactional and marketing email API",
        monthly_price: 19.95,
        website: "https://sendgrid.com",
    },
    SeedTool {
        name: "Resend",
        category: "email",
        description: "Email API for developers",
        monthly_price: 20.0,
        website: "https://resend.com",
    },
    SeedTool {
        name: "Postmark",
        category: "email",
        description: "Fast transactional email delivery",
        monthly_price: 15.0,
        website: "https://postmarkapp.com",
    },
    SeedTool {
        name: "Datadog",
        category: "monitoring",
        description: "Infrastructure monitoring and APM",
        monthly_price: 31.0,
        website: "https://datadoghq.com",
    },
    SeedTool {
        name: "Sentry",
        category: "monitoring",
        description: "Error tracking and performance monitoring",
        monthly_price: 26.0,
        website: "https://sentry.io",
    },
    SeedTool {
        name: "Grafana Cloud",
        category: "monitoring",
        description: "Hosted metrics, logs and dashboards",
        monthly_price: 19.0,
        website: "https://grafana.com",
    },
    SeedTool {
        name: "Figma",
        category: "design",
        description: "Collaborative interface design",
        monthly_price: 15.0,
        website: "https://figma.com",
    },
    SeedTool {
        name: "Penpot",
        category: "design",
        description: "Open source design and prototyping",
        monthly_price: 0.0,
        website: "https://penpot.app",
    },
    SeedTool {
        name: "Notion",
        category: "productivity",
        description: "Docs, wikis and project management",
        monthly_price: 10.0,
        website: "https://notion.so",
    },
    SeedTool {
        name: "Linear",
        category: "productivity",
        description: "Issue tracking for software teams",
        monthly_price: 8.0,
        website: "https://linear.app",
    },
];

impl Database {
    /// Insert the starter catalog, skipping names that already exist
    ///
    /// Returns the number of rows inserted.
    pub fn seed_catalog(&self) -> Result<usize> {
        let mut inserted = 0;

        for seed in STARTER_CATALOG {
            if self.get_tool_by_name(seed.name)?.is_some() {
                continue;
            }

            let tool = CatalogTool::new(seed.name)
                .with_category(seed.category)
                .with_description(seed.description)
                .with_monthly_price(seed.monthly_price)
                .with_website(seed.website)
                .approved();

            self.insert_tool(&tool)?;
            inserted += 1;
        }

        Ok(inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_is_idempotent() {
        let db = Database::open_in_memory().unwrap();

        let first = db.seed_catalog().unwrap();
        assert_eq!(first, STARTER_CATALOG.len());

        let second = db.seed_catalog().unwrap();
        assert_eq!(second, 0);
        assert_eq!(db.tool_count().unwrap() as usize, STARTER_CATALOG.len());
    }

    #[test]
    fn test_seeded_tools_are_approved() {
        let db = Database::open_in_memory().unwrap();
        db.seed_catalog().unwrap();

        let found = db.find_approved_by_name("sentry").unwrap().unwrap();
        assert_eq!(found.name, "Sentry");
        assert_eq!(found.category.as_deref(), Some("monitoring"));
    }
}
