/// Scores below this use the low-impact template set.
pub const LOW_SCORE_BELOW: u8 = 50;

const LOW_SCORE_TEMPLATES: [&str; 3] = [
    "{name} is a tasty pick 🌱\nIts packaging is hard on the environment, though.\nA glass or can alternative could cut around 30% of the waste.",
    "Enjoy your {name} 🌱\nThe packaging on this one is not very sustainable.\nChoosing glass or cardboard next time could save about 25% of the waste.",
    "{name} is a favourite for a reason 🌱\nThe plastic around it is what hurts nature.\nTry one of the alternatives and you could halve the waste.",
];

const GOOD_SCORE_TEMPLATES: [&str; 3] = [
    "Great pick! Choosing {name} is a real win 🌱\nIts packaging is one of the greener options.\nYou are cutting roughly 40% of the waste this way.",
    "By choosing {name} you are helping the planet 🌱\nThat is an inspiring decision.\nAbout 35% of the waste is saved with choices like this.",
    "{name} makes the world a little lighter 🌱\nA sustainable choice that pays off for the future.\nAround 45% of the waste is avoided this way.",
];

/// Deterministic local message used whenever generation is unavailable.
///
/// The template set follows the score band and the entry within it follows a
/// stable hash of the product name, so the same product always gets the same text.
pub fn fallback_message(product_name: &str, score: u8) -> String {
    let templates = if score < LOW_SCORE_BELOW {
        &LOW_SCORE_TEMPLATES
    } else {
        &GOOD_SCORE_TEMPLATES
    };

    let index = name_hash(product_name) % templates.len();
    templates[index].replace("{name}", product_name)
}

fn name_hash(name: &str) -> usize {
    name.bytes()
        .fold(0usize, |acc, byte| acc.wrapping_mul(31).wrapping_add(byte as usize))
}
