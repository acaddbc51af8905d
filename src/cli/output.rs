//! Score rendering: tab-separated text or pretty JSON

use anyhow::Result;
use laplacian_centrality::CentralityScores;

/// Order scores for display: visit order, or the `top` highest scores.
pub fn select(scores: &CentralityScores<String>, top: Option<usize>) -> Vec<(&str, f64)> {
    let mut rows: Vec<(&str, f64)> = scores.iter().map(|(k, &v)| (k.as_str(), v)).collect();
    if let Some(top) = top {
        // Stable sort keeps visit order among ties
        rows.sort_by(|a, b| b.1.total_cmp(&a.1));
        rows.truncate(top);
    }
    rows
}

/// One `label<TAB>score` line per node
pub fn render_text(rows: &[(&str, f64)]) -> String {
    rows.iter()
        .map(|(label, score)| format!("{}\t{:.7}", label, score))
        .collect::<Vec<_>>()
        .join("\n")
}

/// JSON object keyed by label, in row order
pub fn render_json(rows: &[(&str, f64)]) -> Result<String> {
    let map: indexmap::IndexMap<&str, f64> = rows.iter().copied().collect();
    Ok(serde_json::to_string_pretty(&map)?)
}

pub fn render(scores: &CentralityScores<String>, format: &str, top: Option<usize>) -> Result<String> {
    let rows = select(scores, top);
    match format {
        "json" => render_json(&rows),
        _ => Ok(render_text(&rows)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores() -> CentralityScores<String> {
        [("a", 0.6), ("b", 1.0), ("c", 0.6), ("d", 0.25)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    #[test]
    fn test_text_keeps_visit_order() {
        let text = render(&scores(), "text", None).unwrap();
        assert_eq!(text, "a\t0.6000000\nb\t1.0000000\nc\t0.6000000\nd\t0.2500000");
    }

    #[test]
    fn test_top_sorts_descending_with_stable_ties() {
        let scores = scores();
        let rows = select(&scores, Some(3));
        let labels: Vec<&str> = rows.iter().map(|(l, _)| *l).collect();
        assert_eq!(labels, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_json_is_ordered_object() {
        let json = render(&scores(), "json", Some(2)).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["b"], 1.0);
        assert_eq!(parsed["a"], 0.6);
        assert!(parsed.get("d").is_none());
        assert!(json.find("\"b\"").unwrap() < json.find("\"a\"").unwrap());
    }

    #[test]
    fn test_empty_scores() {
        assert_eq!(render(&CentralityScores::new(), "text", None).unwrap(), "");
        assert_eq!(render(&CentralityScores::new(), "json", None).unwrap(), "{}");
    }
}
