//! Literature specialist
//!
//! Searches a small built-in catalogue of abstracts, plus an optional
//! publication list, then mines the hits for themes, knowledge gaps,
//! conclusions and hypotheses.

use super::read_source;
use crate::error::Result;
use crate::render::{DetailBlock, DetailRenderer, DetailSection};
use crate::specialist::{Payload, Specialist};
use crate::types::CapabilityTag;
use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::{debug, warn};

static CONCLUSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)concludes that([^.]+)").expect("valid conclusion pattern"));

static HYPOTHESIS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)hypothesis:([^.]+)").expect("valid hypothesis pattern"));

/// A publication found for a request
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    /// Where the full text lives
    pub link: String,
    /// Abstract, or a generated summary for catalogued publications
    #[serde(rename = "abstract")]
    pub abstract_text: String,
}

/// Result of mining the articles found for a request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LiteratureAnalysis {
    /// Articles that matched the request
    pub articles: Vec<Article>,
    /// Article count per theme
    pub themes: BTreeMap<String, usize>,
    /// Themes the articles do not cover
    pub gaps: Vec<String>,
    /// `In '<title>': <conclusion>.` lines
    pub conclusions: Vec<String>,
    /// `In '<title>': <hypothesis>.` lines
    pub hypotheses: Vec<String>,
}

impl LiteratureAnalysis {
    /// Number of articles analyzed
    pub fn total_articles(&self) -> usize {
        self.articles.len()
    }
}

struct Topic {
    /// Request terms selecting the built-in article
    triggers: &'static [&'static str],
    /// Terms marking an article as covering the theme
    markers: &'static [&'static str],
    theme: &'static str,
    gap: &'static str,
    article: (&'static str, &'static str, &'static str),
}

const TOPICS: &[Topic] = &[
    Topic {
        triggers: &["mars", "martian"],
        markers: &["mars"],
        theme: "mars_exploration",
        gap: "Further study the feasibility of habitats on Mars.",
        article: (
            "Mars Exploration: Challenges and Opportunities",
            "https://example.com/mars_exploration",
            "This article discusses the main challenges and opportunities in human and robotic \
             exploration of Mars, including radiation and resources. It concludes that international \
             collaboration is crucial. Hypothesis: new propulsion technologies will reduce travel time.",
        ),
    },
    Topic {
        triggers: &["microgravity"],
        markers: &["microgravity"],
        theme: "microgravity",
        gap: "More research is needed on the long-term effects of microgravity.",
        article: (
            "Effects of Microgravity on Biological Systems",
            "https://example.com/microgravity_biology",
            "A comprehensive review of how microgravity affects the physiology of humans and other \
             organisms during space missions. It concludes that bone loss is a significant problem. \
             Hypothesis: continuous exercise can mitigate the effects.",
        ),
    },
    Topic {
        triggers: &["radiation"],
        markers: &["radiation"],
        theme: "space_radiation",
        gap: "Studies on new forms of radiation protection are lacking.",
        article: (
            "Radiation Protection for Space Travel",
            "https://example.com/space_radiation",
            "Strategies and technologies to mitigate the risks of cosmic radiation on long-duration \
             missions. It concludes that active shielding is promising. Hypothesis: lightweight \
             materials can offer adequate protection.",
        ),
    },
    Topic {
        triggers: &["biology", "life sciences"],
        markers: &["biology", "life sciences"],
        theme: "space_biology",
        gap: "",
        article: (
            "Advances in Space Biology",
            "https://example.com/space_biology",
            "Recent discoveries and future directions in space biology research. It concludes that \
             genomics research is fundamental. Hypothesis: extremophile organisms can survive on Mars.",
        ),
    },
];

#[derive(Debug, Deserialize)]
struct CatalogRow {
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Link")]
    link: String,
}

/// Mines scientific abstracts relevant to a request
pub struct LiteratureSpecialist {
    catalog: Option<String>,
    client: Client,
}

impl LiteratureSpecialist {
    /// Create a specialist using only the built-in catalogue
    pub fn new() -> Self {
        Self {
            catalog: None,
            client: Client::new(),
        }
    }

    /// Also search a publication list (CSV with `Title` and `Link` columns)
    pub fn with_catalog(mut self, source: impl Into<String>) -> Self {
        self.catalog = Some(source.into());
        self
    }

    /// Use a shared HTTP client
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    async fn catalog_matches(&self, terms: &[&str]) -> Vec<Article> {
        let Some(source) = &self.catalog else {
            return Vec::new();
        };
        if terms.is_empty() {
            return Vec::new();
        }
        // An unreachable catalog narrows the search; it does not fail it.
        match load_catalog(&self.client, source).await {
            Ok(rows) => rows
                .into_iter()
                .filter(|row| {
                    let title = row.title.to_lowercase();
                    terms.iter().any(|t| title.contains(t))
                })
                .map(|row| Article {
                    abstract_text: format!(
                        "Catalogued publication: {}. This article covers aspects of space biology \
                         and their impacts. It concludes that more studies are needed. \
                         Hypothesis: microgravity data are crucial.",
                        row.title
                    ),
                    title: row.title,
                    link: row.link,
                })
                .collect(),
            Err(e) => {
                warn!(source = %source, error = %e, "publication catalog unavailable");
                Vec::new()
            }
        }
    }
}

impl Default for LiteratureSpecialist {
    fn default() -> Self {
        Self::new()
    }
}

async fn load_catalog(client: &Client, source: &str) -> Result<Vec<CatalogRow>> {
    let content = read_source(client, source).await?;
    let mut reader = csv::Reader::from_reader(content.as_bytes());
    let rows = reader.deserialize().collect::<std::result::Result<Vec<CatalogRow>, _>>()?;
    Ok(rows)
}

/// Analyze a set of articles
pub fn analyze_articles(articles: Vec<Article>) -> LiteratureAnalysis {
    let mut analysis = LiteratureAnalysis::default();

    for article in &articles {
        let haystack = format!("{} {}", article.title, article.abstract_text).to_lowercase();
        for topic in TOPICS {
            if topic.markers.iter().any(|m| haystack.contains(m)) {
                *analysis.themes.entry(topic.theme.to_string()).or_insert(0) += 1;
            }
        }

        analysis
            .conclusions
            .extend(extract(&CONCLUSION_RE, &article.title, &article.abstract_text));
        analysis
            .hypotheses
            .extend(extract(&HYPOTHESIS_RE, &article.title, &article.abstract_text));
    }

    analysis.gaps = TOPICS
        .iter()
        .filter(|t| !t.gap.is_empty() && !analysis.themes.contains_key(t.theme))
        .map(|t| t.gap.to_string())
        .collect();
    analysis.articles = articles;
    analysis
}

fn extract(re: &Regex, title: &str, text: &str) -> Vec<String> {
    re.captures_iter(text)
        .filter_map(|c| c.get(1))
        .map(|m| format!("In '{}': {}.", title, capitalize(m.as_str().trim())))
        .collect()
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[async_trait]
impl Specialist for LiteratureSpecialist {
    fn tag(&self) -> CapabilityTag {
        CapabilityTag::Literature
    }

    fn name(&self) -> &str {
        "literature"
    }

    async fn invoke(&self, request: &str) -> Result<Payload> {
        let request = request.to_lowercase();
        let matched: Vec<&Topic> = TOPICS
            .iter()
            .filter(|t| t.triggers.iter().any(|k| request.contains(k)))
            .collect();

        let mut articles: Vec<Article> = matched
            .iter()
            .map(|t| Article {
                title: t.article.0.to_string(),
                link: t.article.1.to_string(),
                abstract_text: t.article.2.to_string(),
            })
            .collect();

        let terms: Vec<&str> = matched
            .iter()
            .flat_map(|t| t.triggers.iter().copied())
            .filter(|k| request.contains(k))
            .collect();
        articles.extend(self.catalog_matches(&terms).await);

        debug!(articles = articles.len(), "literature search finished");
        Ok(Payload::Literature(analyze_articles(articles)))
    }
}

impl DetailRenderer for LiteratureAnalysis {
    fn detail_blocks(&self) -> Vec<DetailBlock> {
        let summary = [format!("Articles analyzed: {}", self.total_articles())];
        let themes = self.themes.iter().map(|(theme, n)| format!("{}: {}", theme, n));

        vec![DetailBlock::new(
            "Literature Analysis",
            vec![
                DetailSection::text("Summary", summary),
                DetailSection::text("Main themes", themes),
                DetailSection::text("Potential gaps", self.gaps.iter().cloned()),
                DetailSection::text("Conclusions", self.conclusions.iter().cloned()),
                DetailSection::text("Hypotheses", self.hypotheses.iter().cloned()),
            ],
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    async fn analyze(specialist: &LiteratureSpecialist, request: &str) -> LiteratureAnalysis {
        match specialist.invoke(request).await.unwrap() {
            Payload::Literature(analysis) => analysis,
            other => panic!("unexpected payload: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_topic_articles_and_extraction() {
        let analysis = analyze(
            &LiteratureSpecialist::new(),
            "Search the scientific literature for information about: Mars and radiation",
        )
        .await;

        assert_eq!(analysis.total_articles(), 2);
        assert_eq!(analysis.themes["mars_exploration"], 1);
        // The Mars abstract mentions radiation too.
        assert_eq!(analysis.themes["space_radiation"], 2);
        assert_eq!(
            analysis.gaps,
            vec!["More research is needed on the long-term effects of microgravity.".to_string()]
        );
        assert_eq!(
            analysis.conclusions[0],
            "In 'Mars Exploration: Challenges and Opportunities': International collaboration is crucial."
        );
        assert_eq!(analysis.hypotheses.len(), 2);
    }

    #[tokio::test]
    async fn test_no_topic_reports_every_gap() {
        let analysis = analyze(&LiteratureSpecialist::new(), "comet dust").await;
        assert_eq!(analysis.total_articles(), 0);
        assert!(analysis.themes.is_empty());
        assert_eq!(analysis.gaps.len(), 3);
    }

    #[tokio::test]
    async fn test_catalog_titles_filtered_by_topic() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "Title,Link\n\
             Microgravity and bone density in mice,https://example.org/1\n\
             Plant growth under LED light,https://example.org/2"
        )
        .unwrap();

        let specialist = LiteratureSpecialist::new().with_catalog(file.path().display().to_string());
        let analysis = analyze(&specialist, "microgravity effects").await;

        let titles: Vec<_> = analysis.articles.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Effects of Microgravity on Biological Systems",
                "Microgravity and bone density in mice"
            ]
        );
        assert_eq!(analysis.articles[1].link, "https://example.org/1");
    }

    #[tokio::test]
    async fn test_unreachable_catalog_is_ignored() {
        let specialist = LiteratureSpecialist::new().with_catalog("/no/such/catalog.csv");
        let analysis = analyze(&specialist, "radiation").await;
        assert_eq!(analysis.total_articles(), 1);
    }

    #[test]
    fn test_detail_block_sections() {
        let analysis = analyze_articles(Vec::new());
        let block = &analysis.detail_blocks()[0];
        let non_empty: Vec<_> = block
            .sections
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| s.title.as_str())
            .collect();
        assert_eq!(non_empty, vec!["Summary", "Potential gaps"]);
    }
}
