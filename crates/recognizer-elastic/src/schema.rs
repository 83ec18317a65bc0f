//! Index settings and mappings for the category index.
//!
//! `query.name` is stored once as a keyword and analyzed three ways:
//! `strict` (whole words), `fuzzy` (stemmed words expanded to prefixes) and
//! `edge` (the whole lower-cased name expanded to prefixes).

use std::collections::BTreeMap;

use serde::Serialize;

pub const ID_FIELD: &str = "id";
pub const NAME_FIELD: &str = "query.name";
pub const STRICT_FIELD: &str = "query.name.strict";
pub const FUZZY_FIELD: &str = "query.name.fuzzy";
pub const EDGE_FIELD: &str = "query.name.edge";

pub const MAX_NGRAM_DIFF: u32 = 30;
pub const MIN_TOKEN_LEN: u32 = 3;
pub const FUZZY_MAX_GRAM: u32 = 20;
pub const EDGE_MAX_GRAM: u32 = 30;

// Lower-cased tokens containing anything but Cyrillic or Latin letters are blanked.
const NOISE_PATTERN: &str = ".*[^а-яёa-z].*";

const LOWERCASE: &str = "lowercase";
const REMOVE_NOISE: &str = "name_remove_noise";
const MIN_LENGTH: &str = "name_length";
const STOPWORDS: &str = "russian_stop";
const STEMMER: &str = "russian_stemmer";
const FUZZY_NGRAM: &str = "name_fuzzy_edge_ngram";
const EDGE_NGRAM: &str = "name_edge_ngram";

pub const INDEX_EDGE: &str = "index_name_edge";
pub const INDEX_STRICT: &str = "index_name_strict";
pub const INDEX_FUZZY: &str = "index_name_fuzzy";
pub const SEARCH_KEYWORDS: &str = "search_keywords";
pub const SEARCH_FULL_TEXT: &str = "search_full_text";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexSchema {
    pub settings: IndexSettings,
    pub mappings: Mappings,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexSettings {
    pub index: IndexOptions,
    pub analysis: Analysis,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexOptions {
    pub max_ngram_diff: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub filter: BTreeMap<&'static str, TokenFilter>,
    pub analyzer: BTreeMap<&'static str, Analyzer>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TokenFilter {
    EdgeNgram { min_gram: u32, max_gram: u32 },
    PatternReplace { pattern: &'static str, replacement: &'static str },
    Length { min: u32 },
    Stop { stopwords: &'static str },
    Stemmer { language: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tokenizer {
    /// Unicode word boundaries.
    Standard,
    /// The whole input as one token.
    Keyword,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analyzer {
    #[serde(rename = "type")]
    kind: &'static str,
    pub tokenizer: Tokenizer,
    pub filter: Vec<&'static str>,
}

impl Analyzer {
    pub fn custom(tokenizer: Tokenizer, filter: &[&'static str]) -> Self {
        Self { kind: "custom", tokenizer, filter: filter.to_vec() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mappings {
    pub properties: BTreeMap<&'static str, FieldMapping>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldMapping {
    Keyword {
        #[serde(skip_serializing_if = "BTreeMap::is_empty")]
        fields: BTreeMap<&'static str, FieldMapping>,
    },
    Text { analyzer: &'static str, search_analyzer: &'static str },
    Object { properties: BTreeMap<&'static str, FieldMapping> },
}

impl FieldMapping {
    fn keyword() -> Self { FieldMapping::Keyword { fields: BTreeMap::new() } }

    fn text(analyzer: &'static str, search_analyzer: &'static str) -> Self {
        FieldMapping::Text { analyzer, search_analyzer }
    }
}

pub fn build_schema() -> IndexSchema {
    let filter = BTreeMap::from([
        (REMOVE_NOISE, TokenFilter::PatternReplace { pattern: NOISE_PATTERN, replacement: "" }),
        (MIN_LENGTH, TokenFilter::Length { min: MIN_TOKEN_LEN }),
        (STOPWORDS, TokenFilter::Stop { stopwords: "_russian_" }),
        (STEMMER, TokenFilter::Stemmer { language: "russian" }),
        (FUZZY_NGRAM, TokenFilter::EdgeNgram { min_gram: 1, max_gram: FUZZY_MAX_GRAM }),
        (EDGE_NGRAM, TokenFilter::EdgeNgram { min_gram: 1, max_gram: EDGE_MAX_GRAM }),
    ]);
    let analyzer = BTreeMap::from([
        (INDEX_EDGE, Analyzer::custom(Tokenizer::Keyword, &[LOWERCASE, REMOVE_NOISE, MIN_LENGTH, EDGE_NGRAM])),
        (INDEX_STRICT, Analyzer::custom(Tokenizer::Standard, &[LOWERCASE, REMOVE_NOISE, MIN_LENGTH, STOPWORDS])),
        (INDEX_FUZZY, Analyzer::custom(Tokenizer::Standard, &[LOWERCASE, REMOVE_NOISE, MIN_LENGTH, STOPWORDS, STEMMER, FUZZY_NGRAM])),
        (SEARCH_KEYWORDS, Analyzer::custom(Tokenizer::Standard, &[LOWERCASE])),
        (SEARCH_FULL_TEXT, Analyzer::custom(Tokenizer::Standard, &[LOWERCASE, STOPWORDS, STEMMER])),
    ]);

    let name = FieldMapping::Keyword {
        fields: BTreeMap::from([
            ("edge", FieldMapping::text(INDEX_EDGE, SEARCH_KEYWORDS)),
            ("strict", FieldMapping::text(INDEX_STRICT, SEARCH_KEYWORDS)),
            ("fuzzy", FieldMapping::text(INDEX_FUZZY, SEARCH_FULL_TEXT)),
        ]),
    };
    let properties = BTreeMap::from([
        (ID_FIELD, FieldMapping::keyword()),
        ("query", FieldMapping::Object { properties: BTreeMap::from([("name", name)]) }),
    ]);

    IndexSchema {
        settings: IndexSettings {
            index: IndexOptions { max_ngram_diff: MAX_NGRAM_DIFF },
            analysis: Analysis { filter, analyzer },
        },
        mappings: Mappings { properties },
    }
}
