//! Ontology profiles: which predicates a theme allows, which class its
//! subjects are typed with, and the T-Box template documenting both.
//!
//! The two built-in themes (`event`, `cultural`) carry fixed predicate
//! tables and DBpedia classes. The `other` theme takes its class from the
//! caller and its predicates from configuration.
//!
//! ```
//! use arkg::ontology::{OntologyClass, OntologyRegistry, Theme};
//!
//! let registry = OntologyRegistry::new("ontology");
//! let profile = registry.resolve("event", None).unwrap();
//! assert_eq!(profile.theme(), Theme::Event);
//! assert_eq!(profile.ontology_class(), &OntologyClass::Event);
//! assert!(profile.allows("occurredIn"));
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sophia_api::term::IriRef;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::ids::slug;
use crate::serializer::{
    escape_full_iri, escape_iri, turtle_name, DBO_NS, ONTOLOGY_NS, RDFS_NS, RESOURCE_NS,
};
use crate::text::clean_text;

/// Allowed predicates for the `event` theme (key, Arabic gloss).
pub const EVENT_PREDICATES: &[(&str, &str)] = &[
    ("occurredIn", "وقع في"),
    ("occurredOn", "وقع بتاريخ"),
    ("hasParticipant", "شارك فيه"),
    ("hasOutcome", "نتج عنه"),
    ("relatedToEvent", "مرتبط ب"),
    ("precededBy", "سبق"),
    ("followedBy", "تلاه"),
];

/// Allowed predicates for the `cultural` theme (key, Arabic gloss).
pub const CULTURAL_PREDICATES: &[(&str, &str)] = &[
    ("originatedIn", "نشأت في"),
    ("practicedBy", "تمارس من قبل"),
    ("belongsToCulture", "ينتمي إلى ثقافة"),
    ("relatedTradition", "مرتبط بتقليد"),
    ("hasSymbolism", "له دلالة"),
];

/// Coarse classification selecting the ontology profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Time-bound happenings: wars, conferences, incidents.
    Event,
    /// Heritage, traditions, identity, arts.
    Cultural,
    /// Anything else; requires a user-defined class.
    Other,
}

impl Theme {
    /// The theme name as accepted by [`Theme::from_str`].
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Event => "event",
            Theme::Cultural => "cultural",
            Theme::Other => "other",
        }
    }

    /// File name of the theme's T-Box template.
    #[must_use]
    pub fn template_file(self) -> &'static str {
        match self {
            Theme::Event => "event.tbox.ttl",
            Theme::Cultural => "cultural.tbox.ttl",
            Theme::Other => "custom.tbox.ttl",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "event" => Ok(Theme::Event),
            "cultural" => Ok(Theme::Cultural),
            "other" => Ok(Theme::Other),
            unknown => Err(Error::UnknownTheme(unknown.to_owned())),
        }
    }
}

/// The class every subject of a profile is typed with.
///
/// The theme follows from the variant, so a user-defined theme without a
/// class cannot be constructed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "class", rename_all = "snake_case")]
pub enum OntologyClass {
    /// `dbo:Event`.
    Event,
    /// `dbo:CulturalHeritageObject`.
    Cultural,
    /// A caller-supplied class: a full IRI, a prefixed name using one of
    /// the fixed prefixes, or a bare local name in the `onto:` namespace.
    UserDefined(String),
}

impl OntologyClass {
    /// The theme this class belongs to.
    #[must_use]
    pub fn theme(&self) -> Theme {
        match self {
            OntologyClass::Event => Theme::Event,
            OntologyClass::Cultural => Theme::Cultural,
            OntologyClass::UserDefined(_) => Theme::Other,
        }
    }

    /// The class as written by the caller or the built-in table
    /// (`dbo:Event`, `http://...`, `Manuscript`).
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            OntologyClass::Event => "dbo:Event",
            OntologyClass::Cultural => "dbo:CulturalHeritageObject",
            OntologyClass::UserDefined(class) => class,
        }
    }

    /// The absolute IRI of the class, percent-encoded where the written
    /// class holds characters an IRI may not carry.
    #[must_use]
    pub fn iri(&self) -> String {
        match self.name() {
            ClassName::Absolute(iri) => iri,
            ClassName::Prefixed { ns, local, .. } => format!("{ns}{}", escape_iri(local)),
            ClassName::Local(local) => format!("{ONTOLOGY_NS}{}", escape_iri(&local)),
        }
    }

    /// The class as a Turtle term under the fixed prefixes. Prefixed names
    /// are kept only when their local part is a valid `PN_LOCAL`; otherwise
    /// the full IRI is written.
    #[must_use]
    pub fn turtle_term(&self) -> String {
        match self.name() {
            ClassName::Absolute(iri) => format!("<{iri}>"),
            ClassName::Prefixed { prefix, ns, local } => turtle_name(prefix, ns, local),
            ClassName::Local(local) => turtle_name("onto", ONTOLOGY_NS, &local),
        }
    }

    fn name(&self) -> ClassName<'_> {
        let class = self.as_str();
        if let Some(iri) = absolute_iri(class) {
            return ClassName::Absolute(iri);
        }
        match split_prefixed(class) {
            Some((prefix, ns, local)) => ClassName::Prefixed { prefix, ns, local },
            None => ClassName::Local(slug(class)),
        }
    }
}

impl fmt::Display for OntologyClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a written class name resolves.
enum ClassName<'a> {
    /// A valid absolute IRI, already escaped.
    Absolute(String),
    /// `prefix:local` under one of the fixed prefixes.
    Prefixed {
        prefix: &'a str,
        ns: &'static str,
        local: &'a str,
    },
    /// A bare name, slugged into the `onto:` namespace.
    Local(String),
}

/// The escaped IRI if `class` is an absolute `scheme://...` or `urn:` IRI
/// that stays valid after escaping.
fn absolute_iri(class: &str) -> Option<String> {
    let (scheme, rest) = class.split_once(':')?;
    let scheme_ok = scheme.starts_with(|c: char| c.is_ascii_alphabetic())
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    if !scheme_ok || !(rest.starts_with("//") || scheme.eq_ignore_ascii_case("urn")) {
        return None;
    }
    let iri = escape_full_iri(class);
    if IriRef::new(iri.as_str()).is_err() {
        tracing::debug!(class, "class is not a valid IRI, treating it as a local name");
        return None;
    }
    Some(iri)
}

fn split_prefixed(name: &str) -> Option<(&str, &'static str, &str)> {
    let (prefix, local) = name.split_once(':')?;
    let ns = match prefix {
        "" => RESOURCE_NS,
        "onto" => ONTOLOGY_NS,
        "dbo" => DBO_NS,
        "rdfs" => RDFS_NS,
        _ => return None,
    };
    if local.is_empty() || local.contains(char::is_whitespace) {
        return None;
    }
    Some((prefix, ns, local))
}

/// An allowed predicate key with its Arabic gloss.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Predicate {
    /// Predicate key used in triples and as the `onto:` local name.
    pub key: String,
    /// Human-readable gloss shown to the generator.
    pub gloss: String,
}

/// The T-Box template embedded (as comments) in exported Turtle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaTemplate {
    /// Template text read from the ontology directory.
    Loaded(String),
    /// The template file does not exist.
    Missing {
        /// File name that was looked up.
        file: String,
    },
}

impl SchemaTemplate {
    /// Reads the template, treating a missing file as [`SchemaTemplate::Missing`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] for any read failure other than "not found".
    pub fn load(dir: &Path, file: &str) -> Result<Self> {
        let path = dir.join(file);
        match std::fs::read_to_string(&path) {
            Ok(text) => Ok(SchemaTemplate::Loaded(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "T-Box template missing, using placeholder");
                Ok(SchemaTemplate::Missing {
                    file: file.to_owned(),
                })
            }
            Err(e) => Err(Error::io(path, e)),
        }
    }

    /// The template text, or a placeholder warning when the file was missing.
    #[must_use]
    pub fn text(&self) -> String {
        match self {
            SchemaTemplate::Loaded(text) => text.clone(),
            SchemaTemplate::Missing { file } => format!("# WARNING: Missing T-Box file: {file}"),
        }
    }

    /// Returns `true` if the template file was found.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        matches!(self, SchemaTemplate::Loaded(_))
    }
}

/// Everything a theme contributes to filtering and export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OntologyProfile {
    class: OntologyClass,
    predicates: Vec<Predicate>,
    template: SchemaTemplate,
}

impl OntologyProfile {
    /// Assembles a profile from its parts.
    #[must_use]
    pub fn new(class: OntologyClass, predicates: Vec<Predicate>, template: SchemaTemplate) -> Self {
        Self {
            class,
            predicates,
            template,
        }
    }

    /// The theme of this profile.
    #[must_use]
    pub fn theme(&self) -> Theme {
        self.class.theme()
    }

    /// The class subjects are typed with.
    #[must_use]
    pub fn ontology_class(&self) -> &OntologyClass {
        &self.class
    }

    /// Allowed predicates in declaration order.
    #[must_use]
    pub fn allowed_predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// Returns `true` if `key` exactly matches an allowed predicate.
    #[must_use]
    pub fn allows(&self, key: &str) -> bool {
        self.predicates.iter().any(|p| p.key == key)
    }

    /// The Arabic gloss of an allowed predicate.
    #[must_use]
    pub fn gloss(&self, key: &str) -> Option<&str> {
        self.predicates
            .iter()
            .find(|p| p.key == key)
            .map(|p| p.gloss.as_str())
    }

    /// The schema template.
    #[must_use]
    pub fn template(&self) -> &SchemaTemplate {
        &self.template
    }
}

fn predicate_table(table: &[(&str, &str)]) -> Vec<Predicate> {
    table
        .iter()
        .map(|(key, gloss)| Predicate {
            key: (*key).to_owned(),
            gloss: (*gloss).to_owned(),
        })
        .collect()
}

/// Resolves theme names to [`OntologyProfile`]s.
#[derive(Debug, Clone)]
pub struct OntologyRegistry {
    ontology_dir: PathBuf,
    custom_predicates: Vec<Predicate>,
}

impl OntologyRegistry {
    /// Creates a registry reading templates from `ontology_dir`.
    pub fn new(ontology_dir: impl Into<PathBuf>) -> Self {
        Self {
            ontology_dir: ontology_dir.into(),
            custom_predicates: Vec::new(),
        }
    }

    /// Creates a registry from the configured ontology directory and
    /// custom predicates.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.ontology_dir).with_custom_predicates(
            config
                .custom_predicates
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str())),
        )
    }

    /// Sets the predicates allowed for the `other` theme.
    #[must_use]
    pub fn with_custom_predicates<'a, I>(mut self, predicates: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        self.custom_predicates = predicates
            .into_iter()
            .map(|(key, gloss)| Predicate {
                key: key.to_owned(),
                gloss: gloss.to_owned(),
            })
            .collect();
        self
    }

    /// The directory templates are read from.
    #[must_use]
    pub fn ontology_dir(&self) -> &Path {
        &self.ontology_dir
    }

    /// Resolves a theme name and optional user class to a profile.
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownTheme`] if `theme` is not `event`, `cultural` or `other`.
    /// - [`Error::MissingUserClass`] if `theme` is `other` and `user_class`
    ///   is absent or blank.
    /// - [`Error::Io`] if the template exists but cannot be read.
    pub fn resolve(&self, theme: &str, user_class: Option<&str>) -> Result<OntologyProfile> {
        self.resolve_theme(theme.parse()?, user_class)
    }

    /// Same as [`OntologyRegistry::resolve`] for an already-parsed theme.
    /// `user_class` is ignored for the built-in themes.
    ///
    /// # Errors
    ///
    /// See [`OntologyRegistry::resolve`].
    pub fn resolve_theme(&self, theme: Theme, user_class: Option<&str>) -> Result<OntologyProfile> {
        let (class, predicates) = match theme {
            Theme::Event => (OntologyClass::Event, predicate_table(EVENT_PREDICATES)),
            Theme::Cultural => (OntologyClass::Cultural, predicate_table(CULTURAL_PREDICATES)),
            Theme::Other => {
                let class = user_class
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .ok_or(Error::MissingUserClass)?;
                (
                    OntologyClass::UserDefined(class.to_owned()),
                    self.custom_predicates.clone(),
                )
            }
        };
        let template = SchemaTemplate::load(&self.ontology_dir, theme.template_file())?;
        tracing::debug!(
            theme = %theme,
            class = %class,
            predicates = predicates.len(),
            template_loaded = template.is_loaded(),
            "resolved ontology profile"
        );
        Ok(OntologyProfile::new(class, predicates, template))
    }
}

const EVENT_KEYWORDS: &[&str] = &[
    "event", "war", "conference", "summit", "attack", "explosion", "crisis", "meeting",
    "agreement", "protest", "incident", "حدث", "اجتماع", "مؤتمر", "قمه", "ازمه", "انفجار", "هجوم",
    "صدام", "عمليه", "اتفاق",
];

const CULTURAL_KEYWORDS: &[&str] = &[
    "culture", "heritage", "identity", "tradition", "language", "art", "music", "folklore",
    "customs", "ثقافه", "تراث", "هويه", "عادات", "تقاليد", "لغه", "ادب", "فن", "موسيقي",
];

fn mentions(text: &str, words: &[&str], keyword: &str) -> bool {
    if keyword.is_ascii() {
        words.iter().any(|w| *w == keyword)
    } else {
        text.contains(keyword)
    }
}

/// Rule-based theme hint for obvious cases.
///
/// English keywords must match whole words; Arabic keywords match anywhere,
/// since Arabic attaches articles and conjunctions to the word. Event
/// keywords win over cultural ones. `None` means the text should go to an
/// external classifier.
#[must_use]
pub fn detect_theme_hint(text: &str) -> Option<Theme> {
    let text = clean_text(text).to_lowercase();
    let words: Vec<&str> = text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    if EVENT_KEYWORDS.iter().any(|k| mentions(&text, &words, k)) {
        Some(Theme::Event)
    } else if CULTURAL_KEYWORDS.iter().any(|k| mentions(&text, &words, k)) {
        Some(Theme::Cultural)
    } else {
        None
    }
}

/// Theme counts over a set of texts, used to pick a document-level theme
/// from per-chunk hints.
#[must_use]
pub fn theme_histogram<'a, I>(texts: I) -> BTreeMap<&'static str, usize>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts = BTreeMap::new();
    for text in texts {
        let key = detect_theme_hint(text).map_or("undecided", Theme::as_str);
        *counts.entry(key).or_insert(0) += 1;
    }
    counts
}
