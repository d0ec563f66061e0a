use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// Card name folded to plain letters: accents dropped, `Æ` spelled `Ae`. Stored in `name_ascii`
/// and applied to name search terms, so `lim-dul` finds `Lim-Dûl's Vault`.
pub fn unaccent(name: &str) -> String {
    name.replace('Æ', "Ae")
        .replace('æ', "ae")
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accents_removed() {
        assert_eq!(unaccent("Lim-Dûl's Vault"), "Lim-Dul's Vault");
        assert_eq!(unaccent("Jötun Grunt"), "Jotun Grunt");
        assert_eq!(unaccent("Séance"), "Seance");
    }

    #[test]
    fn test_ligature_spelled_out() {
        assert_eq!(unaccent("Æther Vial"), "Aether Vial");
        assert_eq!(unaccent("Ghazbán Ogre"), "Ghazban Ogre");
    }

    #[test]
    fn test_plain_names_untouched() {
        assert_eq!(unaccent("Lightning Bolt"), "Lightning Bolt");
        assert_eq!(unaccent(""), "");
    }
}
