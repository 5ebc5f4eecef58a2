// Catalog of IPL franchises a source roster can be labelled with.

use squadmix_core::FranchiseInfo;

/// (id, name, primary colour, secondary colour, text colour)
const CATALOG: &[(&str, &str, &str, &str, &str)] = &[
    ("csk", "Chennai Super Kings", "#FFFF3C", "#0081E9", "#000000"),
    ("mi", "Mumbai Indians", "#004B8D", "#00AAF0", "#FFFFFF"),
    ("rcb", "Royal Challengers Bangalore", "#EC1C24", "#000000", "#FFFFFF"),
    ("kkr", "Kolkata Knight Riders", "#3A225D", "#F2C120", "#FFFFFF"),
    ("dc", "Delhi Capitals", "#0078BC", "#EF1C25", "#FFFFFF"),
    ("srh", "Sunrisers Hyderabad", "#FF822A", "#000000", "#FFFFFF"),
    ("rr", "Rajasthan Royals", "#254AA5", "#FF1B90", "#FFFFFF"),
    ("pbks", "Punjab Kings", "#ED1B24", "#A7A9AC", "#FFFFFF"),
    ("gt", "Gujarat Titans", "#1E2D6D", "#B0BFE0", "#FFFFFF"),
    ("lsg", "Lucknow Super Giants", "#A6CFE2", "#0A174A", "#0A174A"),
];

fn to_info(entry: &(&str, &str, &str, &str, &str)) -> FranchiseInfo {
    let (id, name, primary, secondary, text) = *entry;
    FranchiseInfo {
        id: id.to_string(),
        name: name.to_string(),
        primary_color: primary.to_string(),
        secondary_color: secondary.to_string(),
        text_color: text.to_string(),
    }
}

/// Every franchise in catalog order.
pub fn all() -> Vec<FranchiseInfo> {
    CATALOG.iter().map(to_info).collect()
}

/// Look up a franchise by id (case-insensitive).
pub fn find(id: &str) -> Option<FranchiseInfo> {
    let id = id.trim().to_lowercase();
    CATALOG.iter().find(|entry| entry.0 == id).map(to_info)
}

/// Short badge label for a franchise id, e.g. "csk" -> "CSK".
pub fn abbreviation(id: &str) -> String {
    id.to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_ten_unique_ids() {
        let teams = all();
        assert_eq!(teams.len(), 10);
        let mut ids: Vec<&str> = teams.iter().map(|t| t.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 10);
    }

    #[test]
    fn find_is_case_insensitive() {
        let mi = find("MI").unwrap();
        assert_eq!(mi.name, "Mumbai Indians");
        assert_eq!(mi.primary_color, "#004B8D");
        assert!(find("xyz").is_none());
    }

    #[test]
    fn abbreviation_upper_cases_id() {
        assert_eq!(abbreviation("pbks"), "PBKS");
        assert_eq!(abbreviation("rr"), "RR");
    }
}
