//! Display names for anonymous clients.
use rand::seq::IndexedRandom;

const FIRST_NAMES: &[&str] = &[
    "Alice", "Bob", "Carol", "David", "Emma", "Frank", "Grace", "Henry", "Irene", "Jack",
    "Karen", "Liam", "Maria", "Nathan", "Olivia", "Peter", "Rachel", "Samuel", "Tina",
    "Victor", "Wendy",
];

const LAST_NAMES: &[&str] = &[
    "Anderson", "Brown", "Clark", "Davis", "Evans", "Garcia", "Harris", "Jackson", "King",
    "Lewis", "Martin", "Miller", "Moore", "Parker", "Robinson", "Smith", "Taylor", "Thomas",
    "Walker", "White", "Wilson",
];

/// Source of display identities. Names need not be unique.
pub trait NameSource: Send + Sync {
    /// Produce the next display name.
    fn next_name(&self) -> String;
}

/// Random "First Last" names.
pub struct RandomNames;

impl NameSource for RandomNames {
    fn next_name(&self) -> String {
        let mut rng = rand::rng();
        let first = FIRST_NAMES.choose(&mut rng).copied().unwrap_or("Anonymous");
        let last = LAST_NAMES.choose(&mut rng).copied().unwrap_or("User");
        format!("{} {}", first, last)
    }
}
