//! Deterministic flavor-text generation from curated lists.
//!
//! Customer names, strain names for bred seeds, and the one-line
//! activity log flavor the dealer agents write. All generation is
//! deterministic (same RNG stream = same names).

use crate::rng::SubsystemRng;

pub struct NameGenerator;

impl NameGenerator {
    /// Street name for a new customer: first name + street handle.
    pub fn customer_name(rng: &mut SubsystemRng) -> String {
        let first = Self::pick(rng, FIRST_NAMES);
        if rng.chance(0.35) {
            format!("{} \"{}\" {}", first, Self::pick(rng, HANDLES), Self::pick(rng, LAST_NAMES))
        } else {
            format!("{} {}", first, Self::pick(rng, LAST_NAMES))
        }
    }

    /// Name for a hired worker.
    pub fn worker_name(rng: &mut SubsystemRng) -> String {
        format!("{} {}", Self::pick(rng, FIRST_NAMES), Self::pick(rng, LAST_NAMES))
    }

    /// Strain name for a bred offspring: adjective + noun, with an
    /// occasional roman-numeral generation tag.
    pub fn strain_name(rng: &mut SubsystemRng, generation: u32) -> String {
        let base = format!(
            "{} {}",
            Self::pick(rng, STRAIN_ADJECTIVES),
            Self::pick(rng, STRAIN_NOUNS)
        );
        if generation >= 3 && rng.chance(0.4) {
            format!("{} {}", base, Self::roman(generation))
        } else {
            base
        }
    }

    /// Flavor line for a dealer's sale log entry.
    pub fn deal_line(rng: &mut SubsystemRng) -> &'static str {
        Self::pick(rng, DEAL_LINES)
    }

    /// Flavor line for an idle agent log entry.
    pub fn idle_line(rng: &mut SubsystemRng) -> &'static str {
        Self::pick(rng, IDLE_LINES)
    }

    fn pick<'a>(rng: &mut SubsystemRng, list: &[&'a str]) -> &'a str {
        list[rng.next_u64_below(list.len() as u64) as usize]
    }

    fn roman(n: u32) -> &'static str {
        match n {
            3 => "III",
            4 => "IV",
            5 => "V",
            6 => "VI",
            7 => "VII",
            _ => "VIII",
        }
    }
}

const FIRST_NAMES: &[&str] = &[
    "Marco", "Deniz", "Kofi", "Sasha", "Ines", "Tariq", "Lena", "Pavel", "Yusuf", "Marta",
    "Dario", "Nadia", "Ricky", "Selin", "Omar", "Vera", "Janko", "Aylin", "Bruno", "Eva",
    "Milan", "Zoe", "Darius", "Katja", "Leon", "Mira", "Tobias", "Ronja", "Emre", "Paula",
    "Viktor", "Amira", "Jonas", "Dilara", "Falk", "Nora", "Cem", "Ida", "Rafael", "Tessa",
];

const LAST_NAMES: &[&str] = &[
    "Weber", "Costa", "Novak", "Yilmaz", "Petrov", "Keller", "Moreau", "Ricci", "Jansen",
    "Kovacs", "Berger", "Silva", "Horvat", "Demir", "Lindqvist", "Fischer", "Marino",
    "Duarte", "Wagner", "Sokolov", "Brandt", "Vidal", "Krüger", "Aydin", "Lorenz",
    "Pavic", "Schuster", "Falk", "Vogel", "Reyes",
];

const HANDLES: &[&str] = &[
    "Smokey", "Flaco", "Turbo", "Ghost", "Nickel", "Lucky", "Slim", "Hawk", "Dice", "Echo",
];

const STRAIN_ADJECTIVES: &[&str] = &[
    "Purple", "Northern", "Golden", "Frosty", "Sour", "Velvet", "Electric", "Midnight",
    "Crimson", "Silver", "Neon", "Baltic", "Smoky", "Lunar", "Amber",
];

const STRAIN_NOUNS: &[&str] = &[
    "Haze", "Kush", "Dream", "Diesel", "Widow", "Skunk", "Express", "Cookie", "Thunder",
    "Glue", "Punch", "Fog", "Lights", "Sherbet",
];

const DEAL_LINES: &[&str] = &[
    "moved product at the corner kiosk",
    "closed a quick handover behind the club",
    "made a drop at the parking garage",
    "sorted out a regular by the river",
    "flipped a bag at the night market",
    "handled a pickup near the tram stop",
];

const IDLE_LINES: &[&str] = &[
    "is waiting for fresh supply",
    "is keeping an eye on the block",
    "found nobody buying right now",
    "is counting small bills",
    "took a smoke break",
];
