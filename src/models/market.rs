use serde::Serialize;

/// One screenable market: a ticker-suffix convention, an optional reference
/// index whose constituent page can be scraped, and a static base-symbol
/// list that is always available offline of any scrape.
#[derive(Debug, Clone, Serialize)]
pub struct MarketInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub ticker_suffix: &'static str,
    pub reference_index: Option<&'static str>,
    pub constituents: &'static [&'static str],
}

impl MarketInfo {
    /// Apply the market's exchange suffix to a base symbol.
    pub fn suffixed(&self, base: &str) -> String {
        format!("{}{}", base, self.ticker_suffix)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MarketListItem {
    pub id: &'static str,
    pub name: &'static str,
    pub ticker_count: usize,
}

impl From<&MarketInfo> for MarketListItem {
    fn from(market: &MarketInfo) -> Self {
        Self {
            id: market.id,
            name: market.name,
            ticker_count: market.constituents.len(),
        }
    }
}

pub fn find_market(id: &str) -> Option<&'static MarketInfo> {
    ALL_MARKETS.iter().find(|m| m.id.eq_ignore_ascii_case(id))
}

pub fn all_markets() -> &'static [MarketInfo] {
    ALL_MARKETS
}

static ALL_MARKETS: &[MarketInfo] = &[
    MarketInfo {
        id: "ibex35",
        name: "IBEX 35",
        ticker_suffix: ".MC",
        reference_index: Some("^IBEX"),
        constituents: &[
            "SAN", "BBVA", "ITX", "IBE", "REP", "TEF", "CABK", "FER", "AMS",
            "AENA", "ACS", "ELE", "ENG", "GRF", "IAG", "MAP", "MTS", "NTGY",
            "RED", "SAB", "COL", "MRL", "ANA", "ACX", "BKT", "CLNX", "FDR",
            "IDR", "LOG", "MEL", "ROVI", "SCYR", "SLR", "TRE", "VIS",
        ],
    },
    MarketInfo {
        id: "dax",
        name: "DAX 40",
        ticker_suffix: ".DE",
        reference_index: Some("^GDAXI"),
        constituents: &[
            "SAP", "SIE", "ALV", "DTE", "AIR", "MUV2", "BAS", "BAYN", "BMW",
            "MBG", "VOW3", "DBK", "DB1", "ADS", "IFX", "EOAN", "RWE", "HEN3",
            "BEI", "CON", "DHL", "DTG", "FRE", "HEI", "MRK", "PUM", "QIA",
            "RHM", "SHL", "SY1", "VNA", "ZAL",
        ],
    },
    MarketInfo {
        id: "cac40",
        name: "CAC 40",
        ticker_suffix: ".PA",
        reference_index: Some("^FCHI"),
        constituents: &[
            "MC", "OR", "TTE", "SAN", "AIR", "SU", "AI", "BNP", "CS", "DG",
            "EL", "EN", "ENGI", "GLE", "HO", "KER", "LR", "ML", "ORA", "RI",
            "RMS", "RNO", "SAF", "SGO", "STLAP", "VIE", "VIV", "ACA", "CAP",
            "DSY",
        ],
    },
    MarketInfo {
        id: "ftse100",
        name: "FTSE 100",
        ticker_suffix: ".L",
        reference_index: Some("^FTSE"),
        constituents: &[
            "AZN", "SHEL", "HSBA", "ULVR", "BP", "GSK", "DGE", "RIO", "REL",
            "BATS", "LSEG", "NG", "BARC", "LLOY", "VOD", "PRU", "TSCO",
            "AAL", "CRH", "GLEN", "IMB", "NWG", "RKT", "SSE", "STAN",
        ],
    },
    MarketInfo {
        id: "nasdaq100",
        name: "NASDAQ 100",
        ticker_suffix: "",
        reference_index: Some("^NDX"),
        constituents: &[
            "AAPL", "MSFT", "GOOGL", "AMZN", "NVDA", "META", "TSLA", "AVGO",
            "COST", "NFLX", "AMD", "PEP", "ADBE", "CSCO", "INTC", "QCOM",
            "TXN", "INTU", "AMGN", "HON", "SBUX", "BKNG", "GILD", "ADP",
            "MDLZ", "REGN", "VRTX", "PYPL", "MU", "LRCX",
        ],
    },
];
