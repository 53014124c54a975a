use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Duration, Local, NaiveDate};
use clap::Parser;
use serde::Serialize;

use food_dashboard::data::loader::{
    write_table, CLAIMS_FILE, FOOD_LISTINGS_FILE, PROVIDERS_FILE, RECEIVERS_FILE,
};
use food_dashboard::data::model::{Claim, FoodListing, Provider, Receiver};

/// Write a synthetic set of the four dashboard CSVs
#[derive(Parser)]
#[command(name = "generate_sample")]
struct Args {
    /// Output directory (created if missing)
    #[arg(default_value = "data")]
    out_dir: PathBuf,

    /// PRNG seed
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of food listings
    #[arg(long, default_value_t = 200)]
    listings: u64,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    /// Uniform integer in `0..n`.
    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n.max(1)
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len() as u64) as usize]
    }
}

const CITIES: &[&str] = &["Austin", "Boise", "Chicago", "Denver", "Eugene"];
const PROVIDER_TYPES: &[&str] = &["Restaurant", "Grocery Store", "Supermarket", "Catering Service"];
const RECEIVER_TYPES: &[&str] = &["NGO", "Shelter", "Charity", "Individual"];
const FOODS: &[&str] = &["Bread", "Rice", "Soup", "Salad", "Pasta", "Fruits", "Chicken", "Fish"];
const FOOD_TYPES: &[&str] = &["Vegetarian", "Non-Vegetarian", "Vegan"];
const MEAL_TYPES: &[&str] = &["Breakfast", "Lunch", "Dinner", "Snacks"];
const STATUSES: &[&str] = &["Completed", "Pending", "Cancelled"];

const N_PROVIDERS: u64 = 25;
const N_RECEIVERS: u64 = 30;

fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    write_table(path, rows).with_context(|| format!("writing {}", path.display()))
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let mut rng = SimpleRng::new(args.seed);
    let today: NaiveDate = Local::now().date_naive();

    let providers: Vec<Provider> = (1..=N_PROVIDERS)
        .map(|id| {
            let city = rng.pick(CITIES);
            Provider {
                provider_id: id,
                name: Some(format!("Provider {id}")),
                provider_type: Some(rng.pick(PROVIDER_TYPES).to_string()),
                address: Some(format!("{} Market St, {city}", 100 + id)),
                city: Some(city.to_string()),
                contact: Some(format!("555-{:04}", rng.below(10_000))),
            }
        })
        .collect();

    let receivers: Vec<Receiver> = (1..=N_RECEIVERS)
        .map(|id| Receiver {
            receiver_id: id,
            name: Some(format!("Receiver {id}")),
            receiver_type: Some(rng.pick(RECEIVER_TYPES).to_string()),
            city: Some(rng.pick(CITIES).to_string()),
            contact: Some(format!("555-{:04}", rng.below(10_000))),
        })
        .collect();

    // Listings sit in their provider's city; expiry spreads from a few days
    // ago to a week ahead so "expiring today" is usually non-zero.
    let food: Vec<FoodListing> = (1..=args.listings)
        .map(|id| {
            let provider = &providers[rng.below(N_PROVIDERS) as usize];
            let offset = rng.below(11) as i64 - 3;
            FoodListing {
                food_id: id,
                food_name: Some(rng.pick(FOODS).to_string()),
                quantity: 1 + rng.below(50) as u32,
                expiry_date: Some(today + Duration::days(offset)),
                provider_id: provider.provider_id,
                location: provider.city.clone(),
                food_type: Some(rng.pick(FOOD_TYPES).to_string()),
                meal_type: Some(rng.pick(MEAL_TYPES).to_string()),
            }
        })
        .collect();

    let window_start = (today - Duration::days(14))
        .and_hms_opt(0, 0, 0)
        .context("building claim window")?;
    let mut claims: Vec<Claim> = Vec::new();
    for listing in &food {
        // Roughly two listings in three get claimed.
        if rng.below(3) == 0 {
            continue;
        }
        let minutes = rng.below(14 * 24 * 60) as i64;
        claims.push(Claim {
            claim_id: claims.len() as u64 + 1,
            food_id: listing.food_id,
            receiver_id: 1 + rng.below(N_RECEIVERS),
            status: Some(rng.pick(STATUSES).to_string()),
            timestamp: Some(window_start + Duration::minutes(minutes)),
        });
    }

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;
    write_csv(&args.out_dir.join(PROVIDERS_FILE), &providers)?;
    write_csv(&args.out_dir.join(RECEIVERS_FILE), &receivers)?;
    write_csv(&args.out_dir.join(FOOD_LISTINGS_FILE), &food)?;
    write_csv(&args.out_dir.join(CLAIMS_FILE), &claims)?;

    println!(
        "Wrote {} providers, {} receivers, {} listings, {} claims to {}",
        providers.len(),
        receivers.len(),
        food.len(),
        claims.len(),
        args.out_dir.display()
    );
    Ok(())
}
