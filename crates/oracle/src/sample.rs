//! Test samples: Singlish input paired with the expected Sinhala output.
//!
//! The built-in suite holds 24 positive, 10 negative and 1 UI sample. Negative
//! samples are malformed or unusual inputs whose "expected" text is what a
//! careful human would write; several of them are expected to fail.

use crate::result::{OracleError, OracleResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::OnceLock;

/// Sample category, derived from the id prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleKind {
    /// `Pos_Fun_*`: well-formed input
    Positive,
    /// `Neg_Fun_*`: malformed or unusual input
    Negative,
    /// `Pos_UI_*`: typed key by key, output watched while it updates
    Ui,
}

impl SampleKind {
    /// All kinds
    pub const ALL: [Self; 3] = [Self::Positive, Self::Negative, Self::Ui];

    /// Infer the kind from a sample id
    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        if id.starts_with("Pos_UI_") {
            Some(Self::Ui)
        } else if id.starts_with("Pos_") {
            Some(Self::Positive)
        } else if id.starts_with("Neg_") {
            Some(Self::Negative)
        } else {
            None
        }
    }

    /// How the input reaches the page
    #[must_use]
    pub const fn input_mode(&self) -> InputMode {
        match self {
            Self::Positive | Self::Negative => InputMode::Paste,
            Self::Ui => InputMode::Type,
        }
    }

    /// Lowercase name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Ui => "ui",
        }
    }
}

impl fmt::Display for SampleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SampleKind {
    type Err = OracleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "positive" | "pos" => Ok(Self::Positive),
            "negative" | "neg" => Ok(Self::Negative),
            "ui" => Ok(Self::Ui),
            other => Err(OracleError::config(format!(
                "unknown sample kind '{other}' (expected positive, negative or ui)"
            ))),
        }
    }
}

/// Input simulation style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    /// Set the whole value at once
    Paste,
    /// Type one character at a time
    Type,
}

/// One transliteration test case
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sample {
    /// Stable identifier, e.g. `Pos_Fun_0001`
    pub id: String,
    /// Singlish input
    pub input: String,
    /// Expected Sinhala output, or a UI description ending in `display: <text>`
    pub expected: String,
    /// Category
    pub kind: SampleKind,
}

impl Sample {
    /// Create a sample, inferring its kind from the id
    pub fn new(
        id: impl Into<String>,
        input: impl Into<String>,
        expected: impl Into<String>,
    ) -> OracleResult<Self> {
        let id = id.into();
        let kind = SampleKind::from_id(&id).ok_or_else(|| {
            OracleError::config(format!("cannot infer sample kind from id '{id}'"))
        })?;
        Ok(Self::with_kind(id, input, expected, kind))
    }

    /// Create a sample with an explicit kind
    #[must_use]
    pub fn with_kind(
        id: impl Into<String>,
        input: impl Into<String>,
        expected: impl Into<String>,
        kind: SampleKind,
    ) -> Self {
        Self {
            id: id.into(),
            input: input.into(),
            expected: expected.into(),
            kind,
        }
    }

    /// Human-readable test title
    #[must_use]
    pub fn title(&self) -> String {
        match self.kind {
            SampleKind::Positive => format!("{} Positive Functional", self.id),
            SampleKind::Negative => format!("{} Negative Functional", self.id),
            SampleKind::Ui => format!("{} UI - realtime output updates", self.id),
        }
    }

    /// The text the output is compared against.
    ///
    /// UI samples describe the behaviour in prose; the Sinhala text follows
    /// `display:`. Without that marker the whole expectation is used.
    #[must_use]
    pub fn expected_text(&self) -> &str {
        if self.kind != SampleKind::Ui {
            return &self.expected;
        }
        display_marker()
            .captures(&self.expected)
            .and_then(|caps| caps.get(1))
            .map_or(self.expected.as_str(), |m| m.as_str())
    }
}

#[allow(clippy::expect_used)]
fn display_marker() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| Regex::new(r"(?i)display\s*:\s*(.*)$").expect("display marker compiles"))
}

#[derive(Deserialize)]
struct RawSample {
    id: String,
    input: String,
    expected: String,
    #[serde(default)]
    kind: Option<SampleKind>,
}

#[derive(Deserialize)]
struct RawSuite {
    samples: Vec<RawSample>,
}

/// Ordered collection of samples
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SampleSuite {
    samples: Vec<Sample>,
}

impl SampleSuite {
    /// Suite from samples
    #[must_use]
    pub fn new(samples: Vec<Sample>) -> Self {
        Self { samples }
    }

    /// The 35 built-in samples
    #[must_use]
    pub fn builtin() -> Self {
        let samples = BUILTIN_SAMPLES
            .iter()
            .filter_map(|(id, input, expected)| {
                SampleKind::from_id(id).map(|kind| Sample::with_kind(*id, *input, *expected, kind))
            })
            .collect();
        Self { samples }
    }

    /// Parse a YAML suite (`samples: [{id, input, expected, kind?}]`)
    pub fn from_yaml_str(yaml: &str) -> OracleResult<Self> {
        let raw: RawSuite = serde_yaml_ng::from_str(yaml)?;
        let mut samples = Vec::with_capacity(raw.samples.len());
        for s in raw.samples {
            let sample = match s.kind {
                Some(kind) => Sample::with_kind(s.id, s.input, s.expected, kind),
                None => Sample::new(s.id, s.input, s.expected)?,
            };
            samples.push(sample);
        }
        let suite = Self { samples };
        suite.check_unique_ids()?;
        Ok(suite)
    }

    /// Load a YAML suite from disk
    pub fn load(path: &Path) -> OracleResult<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    fn check_unique_ids(&self) -> OracleResult<()> {
        let mut seen = std::collections::HashSet::new();
        for sample in &self.samples {
            if !seen.insert(sample.id.as_str()) {
                return Err(OracleError::config(format!(
                    "duplicate sample id '{}'",
                    sample.id
                )));
            }
        }
        Ok(())
    }

    /// Keep samples whose id contains `id_filter` and whose kind matches
    #[must_use]
    pub fn filter(self, id_filter: Option<&str>, kind: Option<SampleKind>) -> Self {
        let samples = self
            .samples
            .into_iter()
            .filter(|s| id_filter.map_or(true, |f| s.id.contains(f)))
            .filter(|s| kind.map_or(true, |k| s.kind == k))
            .collect();
        Self { samples }
    }

    /// Sample by id
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Sample> {
        self.samples.iter().find(|s| s.id == id)
    }

    /// Iterate in order
    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.samples.iter()
    }

    /// Number of samples
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the suite is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Count per kind
    #[must_use]
    pub fn count(&self, kind: SampleKind) -> usize {
        self.samples.iter().filter(|s| s.kind == kind).count()
    }
}

impl<'a> IntoIterator for &'a SampleSuite {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

impl IntoIterator for SampleSuite {
    type Item = Sample;
    type IntoIter = std::vec::IntoIter<Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.into_iter()
    }
}

/// `(id, input, expected)` for the built-in suite
const BUILTIN_SAMPLES: &[(&str, &str, &str)] = &[
    (
        "Pos_Fun_0001",
        "suba sathiyak!",
        "සුබ සතියක්!",
    ),
    (
        "Pos_Fun_0002",
        "suba udhaesanak!",
        "සුබ උදැසනක්!",
    ),
    (
        "Pos_Fun_0003",
        "kohomadha sathiya?",
        "කොහොමද සතිය?",
    ),
    (
        "Pos_Fun_0004",
        "mama pansalee innee",
        "මම පන්සලේ ඉන්නේ",
    ),
    (
        "Pos_Fun_0005",
        "mata udhavvak karanna puluvandha?",
        "මට උදව්වක් කරන්න පුලුවන්ද?",
    ),
    (
        "Pos_Fun_0006",
        "pitipassata enna",
        "පිටිපස්සට එන්න",
    ),
    (
        "Pos_Fun_0007",
        "mama  bath kanne naehae",
        "මම  බත් කන්නෙ නැහැ",
    ),
    (
        "Pos_Fun_0008",
        "mama iiyee paasal giyaa",
        "මම ඊයේ පාසල් ගියා",
    ),
    (
        "Pos_Fun_0009",
        "api heta pansal yamu",
        "අපි හෙට පන්සල් යමු",
    ),
    (
        "Pos_Fun_0010",
        "api heta gedhara yamu",
        "අපි හෙට ගෙදර යමු",
    ),
    (
        "Pos_Fun_0011",
        "mama chithra adhii saha paata karayi",
        "මම චිත්\u{200D}ර අදී සහ පාට කරයි",
    ),
    (
        "Pos_Fun_0012",
        "oyaa kaemathinam nam api kanna yamu",
        "ඔයා කැමතිනම් නම් අපි කන්න යමු",
    ),
    (
        "Pos_Fun_0013",
        "karunaakarala mata meeka kiyala dhenna haekidha?",
        "කරුනාකරල මට මේක කියල දෙන්න හැකිද?",
    ),
    (
        "Pos_Fun_0014",
        "eeyi, araka karanna",
        "ඒයි, අරක කරන්න",
    ),
    (
        "Pos_Fun_0015",
        "podda podda karamu",
        "පොඩ්ඩ පොඩ්ඩ කරමු",
    ),
    (
        "Pos_Fun_0016",
        "mata bath kanna oonee",
        "මට බත් කන්න ඕනේ",
    ),
    (
        "Pos_Fun_0017",
        "adha WiFi connection naehae, router eka restart karala balanna",
        "අද WiFi connection නැහැ, router එක restart කරල බලන්න",
    ),
    (
        "Pos_Fun_0018",
        "magee NIC eka haelila",
        "මගේ NIC එක හැලිල",
    ),
    (
        "Pos_Fun_0019",
        "api colombo yanna hadhanne ,traffic nisaa leesi nahae yanna",
        "අපි colombo යන්න හදන්නෙ ,traffic නිසා ලේසි නහැ යන්න",
    ),
    (
        "Pos_Fun_0020",
        "Rs. 6000 k dhaeriya haekidha?",
        "Rs. 6000 ක් දැරිය හැකිද?",
    ),
    (
        "Pos_Fun_0021",
        "2026-05-31  patan gamu",
        "2026-05-31  පටන් ගමු",
    ),
    (
        "Pos_Fun_0022",
        "7.30 AM  ta paarata enna",
        "7.30 AM  ට පාරට එන්න",
    ),
    (
        "Pos_Fun_0023",
        "mama    heta   gedhara  yannemi",
        "මම    හෙට   ගෙදර  යන්නෙමි",
    ),
    (
        "Pos_Fun_0024",
        "adha udhee mama town yanna kalin breakfast gaththa. passe yadhdhii traffic  nisaa mama late unaa. manager ta call karala kivva mama dhaen enavaa kiyala. eeta passe meeting thibba nisa vaeda godak thibbaa.havasa  gedhara giyaama podi rest ekak ganna oone kiyala hithuna. api passe kathaa karamu kiyala mama message ekak dhaemmaa",
        "අද උදේ මම town යන්න කලින් breakfast ගත්ත. පස්සෙ යද්දී traffic  නිසා මම late උනා. manager ට call කරල කිව්ව මම දැන් එනවා කියල. ඒට පස්සෙ meeting තිබ්බ නිස වැඩ ගොඩක් තිබ්බා.හවස  ගෙදර ගියාම පොඩි rest එකක් ගන්න ඕනෙ කියල හිතුන. අපි පස්සෙ කතා කරමු කියල මම message එකක් දැම්මා",
    ),
    (
        "Neg_Fun_0025",
        "adhaaapiyanawaa",
        "අද අපි යනවා",
    ),
    (
        "Neg_Fun_0026",
        "matakaamaonee",
        "මට කෑම ඕනේ",
    ),
    (
        "Neg_Fun_0027",
        "mmaa gdhr ynwa",
        "මම ගෙදර යනවා",
    ),
    (
        "Neg_Fun_0028",
        "mama gedhara yanawaa @@### oyaath enawada??",
        "මම ගෙදර යනවා @@### ඔයත් එනවද???",
    ),
    (
        "Neg_Fun_0029",
        "m a m a g e d h a r a y a n a w a a",
        "ම ම ගෙ ද ර ය න වා",
    ),
    (
        "Neg_Fun_0030",
        "aneeee mata oneeee!",
        "අනේ මට ඕනේ",
    ),
    (
        "Neg_Fun_0031",
        "“oyaata” kiyala kiyannawada? (mama sure na!)",
        "\"ඔයාට\" කියල කියනවද?(මම sure නෑ)",
    ),
    (
        "Neg_Fun_0032",
        "OS eke prashana nisa system awul yanawa",
        "OS එකේ ප්\u{200D}රශ්න නිසා system අවුල් යනවා",
    ),
    (
        "Neg_Fun_0033",
        "mama gedhara inne.\n\noyaa koheda inne?\n\napi passe kathaa karamu",
        "මම ගෙදර ඉන්නේ.\n\nඔයා කොහෙද ඉන්නේ?\nඅපි පස්සෙ කතා කරමු",
    ),
    (
        "Neg_Fun_0034",
        "ada ude phone eka charge nathi nisa panic wela, road eke traffic sudden wadi una, ride app eka open karala try karaddi location eka hariyata update wenne na, notification tika pop up wenawa, man eeke type karana msg eka podi podi kaali walata kadenawa , ehema input ekak thibboth system eka meeka correct widihata process karagannawada nathnam output eka confuse wenawada kiyala balanna one",
        "අද උදේ ෆෝන් එක චාර්ජ් නැති නිසා panic වෙලා,road එකේ traffic sudden වැඩි උනා,ride app එක open කරලා try කරද්දි location එක හරියට update වෙන්නේ නෑ ,notification ටික popup වෙනවා,මන් එකේ type කරන msg එක පොඩි පොඩි කෑලි වලට කැඩෙනවා,එහෙම input එකක් තිබ්බොත් system එක මේක  correct විදියට process කරගන්නවද නැත්නම් output එක confuse වෙනවද කියල බලන්න ඕනේ",
    ),
    (
        "Pos_UI_0035",
        "adha office yanna late unaa",
        "Sinhala output should update automatically while typing and display: අද office යන්න late උනා",
    ),];
