//! Province ISO-code lookup.
//!
//! The price API reports provinces as ISO 3166-2:AR codes; the merged
//! output carries display names so prices from different stores of the
//! same chain in the same province become comparable.

/// Display name for an Argentine province code, if known.
pub fn province_name(code: &str) -> Option<&'static str> {
    Some(match code {
        "AR-A" => "Salta",
        "AR-B" => "Provincia de Buenos Aires",
        "AR-C" => "Ciudad Autónoma de Buenos Aires",
        "AR-D" => "San Luis",
        "AR-E" => "Entre Ríos",
        "AR-F" => "La Rioja",
        "AR-G" => "Santiago del Estero",
        "AR-H" => "Chaco",
        "AR-J" => "San Juan",
        "AR-K" => "Catamarca",
        "AR-L" => "La Pampa",
        "AR-M" => "Mendoza",
        "AR-N" => "Misiones",
        "AR-P" => "Formosa",
        "AR-Q" => "Neuquén",
        "AR-R" => "Río Negro",
        "AR-S" => "Santa Fe",
        "AR-T" => "Tucumán",
        "AR-U" => "Chubut",
        "AR-V" => "Tierra del Fuego",
        "AR-W" => "Corrientes",
        "AR-X" => "Córdoba",
        "AR-Y" => "Jujuy",
        "AR-Z" => "Santa Cruz",
        _ => return None,
    })
}

/// Name for a code, passing unknown codes through unchanged. The code set
/// is closed (24 provinces plus the capital), so an unseen value means bad
/// input data; keeping it visible in the output beats aborting a batch run.
pub fn display_name(code: &str) -> &str {
    province_name(code).unwrap_or(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_map_to_names() {
        assert_eq!(province_name("AR-S"), Some("Santa Fe"));
        assert_eq!(province_name("AR-C"), Some("Ciudad Autónoma de Buenos Aires"));
        assert_eq!(province_name("AR-Z"), Some("Santa Cruz"));
    }

    #[test]
    fn unknown_codes_pass_through() {
        assert_eq!(province_name("AR-I"), None);
        assert_eq!(display_name("AR-I"), "AR-I");
        assert_eq!(display_name(""), "");
    }

    #[test]
    fn table_covers_all_24_jurisdictions() {
        let count = ('A'..='Z')
            .filter(|c| province_name(&format!("AR-{c}")).is_some())
            .count();
        assert_eq!(count, 24);
    }
}
