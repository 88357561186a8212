//! Table statique des cultures (code → libellé, couleur)
//!
//! La recherche d'un code inconnu retombe toujours sur l'entrée `default`.

/// Métadonnées d'affichage d'une culture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropInfo {
    /// Code culture (`code_cultu`)
    pub code: &'static str,

    /// Libellé affiché
    pub name: &'static str,

    /// Couleur hexadécimale (`#rrggbb`)
    pub color: &'static str,
}

/// Entrée utilisée pour tout code absent de la table
pub const DEFAULT_CROP: CropInfo = CropInfo {
    code: "default",
    name: "Autre",
    color: "#95a5a6",
};

/// Cultures connues
pub const CROPS: &[CropInfo] = &[
    CropInfo { code: "AVH", name: "Arboriculture Haute Tige", color: "#2ecc71" },
    CropInfo { code: "BTA", name: "Betterave à sucre", color: "#e74c3c" },
    CropInfo { code: "BFS", name: "Blé tendre", color: "#f39c12" },
    CropInfo { code: "BOR", name: "Betterave industrielle", color: "#9b59b6" },
    CropInfo { code: "AFG", name: "Affouragement en vert", color: "#3498db" },
    CropInfo { code: "AVP", name: "Arboriculture Piège", color: "#1abc9c" },
];

/// Recherche une culture par code, `DEFAULT_CROP` si inconnue
pub fn lookup(code: &str) -> &'static CropInfo {
    CROPS.iter().find(|c| c.code == code).unwrap_or(&DEFAULT_CROP)
}

/// Comme [`lookup`] mais accepte un code absent
pub fn lookup_opt(code: Option<&str>) -> &'static CropInfo {
    code.map(lookup).unwrap_or(&DEFAULT_CROP)
}

/// Libellé d'un code: nom connu, sinon le code lui-même
///
/// Les graphiques et le tableau affichent le code brut plutôt que "Autre"
/// pour les cultures hors table.
pub fn display_name(code: &str) -> String {
    match CROPS.iter().find(|c| c.code == code) {
        Some(info) => info.name.to_string(),
        None => code.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known() {
        let info = lookup("AVH");
        assert_eq!(info.name, "Arboriculture Haute Tige");
        assert_eq!(info.color, "#2ecc71");
    }

    #[test]
    fn test_lookup_unknown_falls_back() {
        assert_eq!(lookup("XYZ"), &DEFAULT_CROP);
        assert_eq!(lookup(""), &DEFAULT_CROP);
        assert_eq!(lookup_opt(None), &DEFAULT_CROP);
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("AFG"), "Affouragement en vert");
        assert_eq!(display_name("MIE"), "MIE");
    }
}
