// Deterministic mock data source for apps and campaigns
use crate::application::entity_repository::{check_range, EntityRepository};
use crate::domain::dataset::{
    CampaignRow, CountryRow, Dataset, RetentionRow, RevenueRow, UserRow, VersionRow,
};
use crate::domain::entity::{AppSummary, CampaignSummary, EntityDetails, EntityKey, EntityKind};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use std::time::Duration;

const APPS: &[(&str, &str, &str)] = &[
    ("app-1", "Puzzle Quest", "ios"),
    ("app-2", "Run Rush", "android"),
    ("app-3", "Word Garden", "ios"),
    ("app-4", "Idle Farm", "android"),
];

const CAMPAIGNS: &[(&str, &str, &str, &str)] = &[
    ("cmp-1", "Spring Launch", "app-1", "Meta"),
    ("cmp-2", "Retargeting Q2", "app-1", "Google Ads"),
    ("cmp-3", "Playable Ads", "app-2", "Unity"),
    ("cmp-4", "Brand Search", "app-3", "Apple Search Ads"),
    ("cmp-5", "Lookalike", "app-4", "TikTok"),
];

const COUNTRIES: &[(&str, f64)] = &[
    ("US", 0.42),
    ("DE", 0.16),
    ("JP", 0.18),
    ("BR", 0.09),
    ("IN", 0.15),
];

const VERSIONS: &[(&str, f64)] = &[("2.3.0", 0.12), ("2.4.0", 0.33), ("2.5.0", 0.55)];

const RETENTION_DAYS: &[(&str, f64)] = &[
    ("D1", 42.0),
    ("D3", 27.0),
    ("D7", 16.0),
    ("D14", 10.5),
    ("D30", 6.0),
];

/// Produces the same rows for the same entity and date range on every call,
/// after a fixed artificial delay.
#[derive(Debug, Clone)]
pub struct MockEntityRepository {
    latency: Duration,
}

impl MockEntityRepository {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

#[async_trait]
impl EntityRepository for MockEntityRepository {
    async fn list_apps(&self) -> Result<Vec<AppSummary>> {
        self.simulate_latency().await;

        Ok(APPS
            .iter()
            .map(|(id, name, platform)| {
                let seed = seed_for(id);
                AppSummary {
                    id: id.to_string(),
                    name: name.to_string(),
                    platform: platform.to_string(),
                    total_revenue: round2(base_revenue(seed) * 30.0),
                    total_users: base_users(seed),
                }
            })
            .collect())
    }

    async fn list_campaigns(&self) -> Result<Vec<CampaignSummary>> {
        self.simulate_latency().await;

        Ok(CAMPAIGNS
            .iter()
            .map(|(id, name, app_id, network)| {
                let seed = seed_for(id);
                let spend = round2(600.0 + (seed % 900) as f64) * 30.0;
                CampaignSummary {
                    id: id.to_string(),
                    name: name.to_string(),
                    app_id: app_id.to_string(),
                    network: network.to_string(),
                    spend,
                    revenue: round2(spend * (0.8 + noise(seed, 0) * 0.8)),
                }
            })
            .collect())
    }

    async fn fetch_details(
        &self,
        key: &EntityKey,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Option<EntityDetails>> {
        let days = check_range(start, end)?;
        self.simulate_latency().await;

        let name = match key.kind {
            EntityKind::App => APPS.iter().find(|a| a.0 == key.id).map(|a| a.1),
            EntityKind::Campaign => CAMPAIGNS.iter().find(|c| c.0 == key.id).map(|c| c.1),
        };
        let Some(name) = name else {
            tracing::debug!("Mock repository has no {}", key);
            return Ok(None);
        };

        let seed = seed_for(&key.id);
        let dates: Vec<NaiveDate> = (0..days as u64)
            .filter_map(|offset| start.checked_add_days(Days::new(offset)))
            .collect();

        let datasets = match key.kind {
            EntityKind::App => vec![
                Dataset::Revenue(revenue_rows(seed, &dates)),
                Dataset::Users(user_rows(seed, &dates)),
                Dataset::Retention(retention_rows(seed)),
                Dataset::Countries(country_rows(seed, dates.len())),
                Dataset::Versions(version_rows(seed, dates.len())),
            ],
            EntityKind::Campaign => vec![
                Dataset::Campaign(campaign_rows(seed, &dates)),
                Dataset::Revenue(revenue_rows(seed, &dates)),
                Dataset::Countries(country_rows(seed, dates.len())),
            ],
        };

        Ok(Some(EntityDetails {
            kind: key.kind,
            id: key.id.clone(),
            name: name.to_string(),
            start,
            end,
            datasets,
        }))
    }
}

fn revenue_rows(seed: u64, dates: &[NaiveDate]) -> Vec<RevenueRow> {
    let base = base_revenue(seed);
    dates
        .iter()
        .enumerate()
        .map(|(i, date)| {
            let ad_revenue = round2(base * 0.6 * (0.8 + 0.4 * noise(seed, i as u64)));
            let iap_revenue = round2(base * 0.4 * (0.7 + 0.6 * noise(seed ^ 0x5a, i as u64)));
            let revenue = round2(ad_revenue + iap_revenue);
            RevenueRow {
                date: *date,
                revenue,
                ad_revenue,
                iap_revenue,
                spend: round2(revenue * (0.35 + 0.2 * noise(seed ^ 0xa5, i as u64))),
            }
        })
        .collect()
}

fn user_rows(seed: u64, dates: &[NaiveDate]) -> Vec<UserRow> {
    let mut total = base_users(seed);
    dates
        .iter()
        .enumerate()
        .map(|(i, date)| {
            let new_users = 150 + (noise(seed, i as u64) * 250.0) as u64;
            total += new_users;
            UserRow {
                date: *date,
                total_users: total,
                new_users,
                active_users: (total as f64 * (0.25 + 0.1 * noise(seed ^ 0x33, i as u64))) as u64,
            }
        })
        .collect()
}

fn retention_rows(seed: u64) -> Vec<RetentionRow> {
    RETENTION_DAYS
        .iter()
        .enumerate()
        .map(|(i, (day, rate))| RetentionRow {
            day: day.to_string(),
            retention: round2(rate * (0.85 + 0.3 * noise(seed, i as u64))),
        })
        .collect()
}

fn country_rows(seed: u64, days: usize) -> Vec<CountryRow> {
    let revenue = base_revenue(seed) * days as f64;
    let users = base_users(seed) as f64;
    COUNTRIES
        .iter()
        .map(|(country, share)| CountryRow {
            country: country.to_string(),
            revenue: round2(revenue * share),
            users: (users * share) as u64,
        })
        .collect()
}

fn version_rows(seed: u64, days: usize) -> Vec<VersionRow> {
    let revenue = base_revenue(seed) * days as f64;
    let users = base_users(seed) as f64;
    VERSIONS
        .iter()
        .map(|(version, share)| VersionRow {
            version: version.to_string(),
            users: (users * share) as u64,
            revenue: round2(revenue * share),
        })
        .collect()
}

fn campaign_rows(seed: u64, dates: &[NaiveDate]) -> Vec<CampaignRow> {
    dates
        .iter()
        .enumerate()
        .map(|(i, date)| {
            let impressions = 8_000 + (noise(seed, i as u64) * 6_000.0) as u64;
            let clicks = impressions * 3 / 100;
            let installs = clicks / 5;
            let spend = round2(installs as f64 * 1.8);
            CampaignRow {
                date: *date,
                impressions,
                clicks,
                installs,
                spend,
                revenue: round2(spend * (0.8 + 0.8 * noise(seed ^ 0x77, i as u64))),
            }
        })
        .collect()
}

fn base_revenue(seed: u64) -> f64 {
    400.0 + (seed % 800) as f64
}

fn base_users(seed: u64) -> u64 {
    20_000 + seed % 30_000
}

/// FNV-1a over the entity id
fn seed_for(id: &str) -> u64 {
    id.bytes().fold(0xcbf2_9ce4_8422_2325, |hash, byte| {
        (hash ^ byte as u64).wrapping_mul(0x0100_0000_01b3)
    })
}

/// Deterministic value in [0, 1) for the given seed and position
fn noise(seed: u64, index: u64) -> f64 {
    let mut x = seed ^ index.wrapping_mul(0x9e37_79b9_7f4a_7c15);
    x ^= x >> 33;
    x = x.wrapping_mul(0xff51_afd7_ed55_8ccd);
    x ^= x >> 33;
    (x >> 11) as f64 / (1u64 << 53) as f64
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
