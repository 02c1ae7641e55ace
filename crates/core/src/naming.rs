//! Display formatting for names, numbers, stats and type tags.

use crate::types::EntryId;

/// Capitalize the first letter and turn the first hyphen into a space.
///
/// # Examples
///
/// ```
/// use pokedex_core::naming::format_name;
///
/// assert_eq!(format_name("pikachu"), "Pikachu");
/// assert_eq!(format_name("mr-mime"), "Mr mime");
/// assert_eq!(format_name("ho-oh-ex"), "Ho oh-ex");
/// ```
pub fn format_name(name: &str) -> String {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let rest = chars.as_str().replacen('-', " ", 1);
    first.to_uppercase().chain(rest.chars()).collect()
}

/// Human label for a base-stat name; unknown stats fall back to
/// [`format_name`].
pub fn format_stat_name(stat: &str) -> String {
    match stat {
        "hp" => "HP".to_string(),
        "attack" => "Attack".to_string(),
        "defense" => "Defense".to_string(),
        "special-attack" => "Sp. Attack".to_string(),
        "special-defense" => "Sp. Defense".to_string(),
        "speed" => "Speed".to_string(),
        other => format_name(other),
    }
}

/// Dex number padded to three digits, e.g. `#025`.
pub fn format_id(id: EntryId) -> String {
    format!("#{id:03}")
}

/// Height in meters from decimeters, e.g. `0.4 m`.
pub fn format_height(decimeters: u32) -> String {
    format!("{}.{} m", decimeters / 10, decimeters % 10)
}

/// Weight in kilograms from hectograms, e.g. `6.0 kg`.
pub fn format_weight(hectograms: u32) -> String {
    format!("{}.{} kg", hectograms / 10, hectograms % 10)
}

/// Colour tag for a type badge. Unknown types share the neutral grey.
pub fn type_color(type_name: &str) -> &'static str {
    match type_name {
        "normal" => "gray-400",
        "fire" => "red-500",
        "water" => "blue-500",
        "electric" => "yellow-400",
        "grass" => "green-500",
        "ice" => "blue-300",
        "fighting" => "red-700",
        "poison" => "purple-500",
        "ground" => "yellow-600",
        "flying" => "blue-400",
        "psychic" => "pink-500",
        "bug" => "green-400",
        "rock" => "yellow-800",
        "ghost" => "purple-700",
        "dragon" => "purple-600",
        "dark" => "gray-800",
        "steel" => "gray-600",
        "fairy" => "pink-400",
        _ => "gray-400",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_name_handles_empty_and_unicode() {
        assert_eq!(format_name(""), "");
        assert_eq!(format_name("é"), "É");
        assert_eq!(format_name("nidoran-f"), "Nidoran f");
    }

    #[test]
    fn stat_names() {
        assert_eq!(format_stat_name("hp"), "HP");
        assert_eq!(format_stat_name("special-defense"), "Sp. Defense");
        assert_eq!(format_stat_name("accuracy"), "Accuracy");
    }

    #[test]
    fn ids_are_zero_padded() {
        assert_eq!(format_id(1), "#001");
        assert_eq!(format_id(25), "#025");
        assert_eq!(format_id(1025), "#1025");
    }

    #[test]
    fn measurements_convert_units() {
        assert_eq!(format_height(4), "0.4 m");
        assert_eq!(format_height(17), "1.7 m");
        assert_eq!(format_weight(60), "6.0 kg");
        assert_eq!(format_weight(9050), "905.0 kg");
    }

    #[test]
    fn type_colors() {
        assert_eq!(type_color("fire"), "red-500");
        assert_eq!(type_color("shadow"), "gray-400");
    }
}
