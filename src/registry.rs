//! Static ticker universe (SBF120 and a few neighbouring European listings)
//!
//! Symbols are Yahoo-style exchange-suffixed codes. Display names are not
//! unique; symbols are.

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

/// (symbol, display name), in display order
pub const TICKERS: &[(&str, &str)] = &[
    ("AC.PA", "Accor"),
    ("AI.PA", "Air Liquide"),
    ("AIR.PA", "Airbus"),
    ("AKE.PA", "Arkema"),
    ("ALO.PA", "Alstom"),
    ("ALD.PA", "ALD"),
    ("ATO.PA", "Atos"),
    ("MT.AS", "ArcelorMittal"),
    ("AUB.PA", "Aubay"),
    ("AUD.PA", "Aubert & Duval"),
    ("A2E.PA", "2CRSI"),
    ("BEN.PA", "Beneteau"),
    ("BNP.PA", "BNP Paribas"),
    ("EN.PA", "Bouygues"),
    ("CAP.PA", "Capgemini"),
    ("CA.PA", "Carrefour"),
    ("COFA.PA", "Coface"),
    ("CRL.PA", "CRH (Euronext Paris)"),
    ("CS.PA", "AXA"),
    ("DBV.PA", "DBV Technologies"),
    ("DSY.PA", "Dassault Systèmes"),
    ("EDEN.PA", "Edenred"),
    ("EI.PA", "EssilorLuxottica"),
    ("EL.PA", "Legrand"),
    ("ENGI.PA", "Engie"),
    ("ERF.PA", "Eramet"),
    ("ETL.PA", "Eutelsat"),
    ("EUX.PA", "Euronext"),
    ("FGR.PA", "Covivio"),
    ("FNAC.PA", "Fnac Darty"),
    ("FR.PA", "Valeo"),
    ("FRE.PA", "Faurecia"),
    ("GENP.PA", "Genfit"),
    ("GET.PA", "Getlink"),
    ("GLPG.AS", "Galapagos"),
    ("GLP.PA", "Groupe Legrand Publicitaire"),
    ("GTT.PA", "Gaztransport & Technigaz"),
    ("HEL.PA", "Hermès International"),
    ("HO.PA", "Thales"),
    ("ILIAD.PA", "Iliad"),
    ("IMB.PA", "Imerys"),
    ("INGA.AS", "ING"),
    ("IPS.PA", "Ipsen"),
    ("ITP.PA", "Interparfums"),
    ("KER.PA", "Kering"),
    ("KORI.PA", "Korian"),
    ("LHA.DE", "Lufthansa"),
    ("LLD.PA", "Linedata Services"),
    ("LOIM.PA", "Laurent-Perrier"),
    ("LVMH.PA", "LVMH"),
    ("MDT.PA", "Medtronic"),
    ("MDG.PA", "M6-Metropole Television"),
    ("MIC.PA", "Michelin"),
    ("MMP.PA", "Mercialys"),
    ("MN.PA", "Mersen"),
    ("MRN.PA", "Maurette"),
    ("NEOEN.PA", "Neoen"),
    ("NEX.PA", "Nexans"),
    ("NXI.PA", "Nexity"),
    ("OR.PA", "L'Oréal"),
    ("ORA.PA", "Orange"),
    ("OTIS.PA", "Otis Worldwide"),
    ("PARP.PA", "Paref"),
    ("POM.PA", "Poujoulat"),
    ("PUB.PA", "Publicis"),
    ("QFB.PA", "Quartix Holdings"),
    ("RCO.PA", "Renault"),
    ("RMS.PA", "Hermès"),
    ("RI.PA", "Pernod Ricard"),
    ("RNO.PA", "Renault"),
    ("SAF.PA", "Safran"),
    ("SAM.PA", "Somfy"),
    ("SAN.PA", "Sanofi"),
    ("SAP.PA", "Sartorius Stedim Biotech"),
    ("SGO.PA", "Saint-Gobain"),
    ("SLB.PA", "Schlumberger"),
    ("SOP.PA", "Sopra Steria Group"),
    ("SRP.PA", "Showroomprivé"),
    ("STLA.PA", "Stellantis"),
    ("SU.PA", "Schneider Electric"),
    ("SW.PA", "Sodexo"),
    ("SY.PA", "Synergie"),
    ("TEC.PA", "Technip Energies"),
    ("TTF.PA", "Teleperformance"),
    ("TTE.PA", "TotalEnergies"),
    ("UBI.PA", "Ubisoft Entertainment"),
    ("UL.PA", "Unibail-Rodamco-Westfield"),
    ("VIE.PA", "Veolia Environnement"),
    ("VIV.PA", "Vivendi"),
    ("VK.PA", "Vallourec"),
    ("WLN.PA", "Worldline"),
];

/// A fuzzy search hit against the registry
#[derive(Debug, Clone, PartialEq)]
pub struct RegistryMatch {
    pub symbol: &'static str,
    pub name: &'static str,
    pub score: i64,
}

pub fn display_name(symbol: &str) -> Option<&'static str> {
    TICKERS
        .iter()
        .find(|(s, _)| *s == symbol)
        .map(|(_, name)| *name)
}

/// Every registry symbol, the default selection
pub fn all_symbols() -> Vec<String> {
    TICKERS.iter().map(|(s, _)| s.to_string()).collect()
}

pub fn choice_label(symbol: &str, name: &str) -> String {
    format!("{} ({})", name, symbol)
}

pub fn choices() -> Vec<String> {
    TICKERS
        .iter()
        .map(|(symbol, name)| choice_label(symbol, name))
        .collect()
}

/// Recover the symbol from a `"Name (SYMBOL)"` label.
///
/// Only the text after the last `(` is used, so names that contain
/// parentheses themselves still resolve.
pub fn symbol_from_choice(label: &str) -> String {
    label
        .rsplit('(')
        .next()
        .unwrap_or(label)
        .replace(')', "")
        .trim()
        .to_string()
}

/// Fuzzy lookup over `"Name (SYMBOL)"` labels, best match first
pub fn search(query: &str, limit: usize) -> Vec<RegistryMatch> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }

    let matcher = SkimMatcherV2::default().ignore_case();
    let mut hits: Vec<RegistryMatch> = TICKERS
        .iter()
        .filter_map(|&(symbol, name)| {
            matcher
                .fuzzy_match(&choice_label(symbol, name), query)
                .map(|score| RegistryMatch { symbol, name, score })
        })
        .collect();

    // sort_by is stable, so equal scores stay in registry order
    hits.sort_by(|a, b| b.score.cmp(&a.score));
    hits.truncate(limit);
    hits
}
