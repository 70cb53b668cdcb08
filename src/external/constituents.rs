use regex::Regex;
use tracing::warn;

/// Best-effort scrape of an index's constituent symbols from the provider's
/// public components page. Any failure (network, bad page, no matches)
/// yields an empty list so the caller falls back to its static catalog; the
/// screener never depends on this succeeding.
pub async fn fetch_index_members(client: &reqwest::Client, index_symbol: &str) -> Vec<String> {
    let url = format!("https://finance.yahoo.com/quote/{index_symbol}/components");

    let body = match client.get(&url).send().await {
        Ok(resp) if resp.status().is_success() => match resp.text().await {
            Ok(text) => text,
            Err(e) => {
                warn!("Constituent page for {} unreadable: {}", index_symbol, e);
                return Vec::new();
            }
        },
        Ok(resp) => {
            warn!(
                "Constituent page for {} returned {}",
                index_symbol,
                resp.status()
            );
            return Vec::new();
        }
        Err(e) => {
            warn!("Constituent scrape for {} failed: {}", index_symbol, e);
            return Vec::new();
        }
    };

    extract_symbols(&body)
}

/// Pulls `data-symbol="XYZ"` attributes out of the components table markup.
fn extract_symbols(html: &str) -> Vec<String> {
    let Ok(re) = Regex::new(r#"data-symbol="([A-Z0-9][A-Z0-9.\-]*)""#) else {
        return Vec::new();
    };

    let mut symbols: Vec<String> = Vec::new();
    for cap in re.captures_iter(html) {
        let symbol = cap[1].to_string();
        // index symbols themselves (^IBEX etc.) never match; dedupe repeats
        if !symbols.contains(&symbol) {
            symbols.push(symbol);
        }
    }
    symbols
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_symbols_from_markup() {
        let html = r#"
            <tr data-symbol="SAN.MC"><td>Banco Santander</td></tr>
            <tr data-symbol="BBVA.MC"><td>BBVA</td></tr>
            <tr data-symbol="SAN.MC"><td>duplicate row</td></tr>
        "#;
        assert_eq!(extract_symbols(html), vec!["SAN.MC", "BBVA.MC"]);
    }

    #[test]
    fn test_extract_symbols_empty_page() {
        assert!(extract_symbols("<html><body>nothing here</body></html>").is_empty());
    }
}
