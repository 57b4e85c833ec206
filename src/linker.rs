//! Drug mention linking.
//!
//! For every drug, scans publication titles and then trial titles for the
//! drug name as a whole word, ignoring case. The name is matched literally:
//! regex metacharacters in it carry no meaning.
//!
//! This is a plain drugs x articles scan. Inputs are small batch files, so no
//! title index is built.

use crate::error::Result;
use crate::records::{Article, Drug, Mention, MentionsGraph};
use regex::{Regex, RegexBuilder};
use tracing::{debug, info};

/// Case-insensitive whole-word matcher for one drug name
#[derive(Debug, Clone)]
pub struct DrugMatcher {
    pattern: Regex,
}

impl DrugMatcher {
    pub fn new(name: &str) -> Result<Self> {
        let pattern = RegexBuilder::new(&format!(r"\b{}\b", regex::escape(name)))
            .case_insensitive(true)
            .build()?;
        Ok(Self { pattern })
    }

    pub fn is_mentioned_in(&self, title: &str) -> bool {
        self.pattern.is_match(title)
    }
}

/// Build the drug -> mentions graph.
///
/// Keys follow drug order. Each drug's list holds its publication mentions
/// then its trial mentions, both in row order. Drugs found nowhere are left
/// out, and so are drugs with a null name.
pub fn build_mentions_graph(
    drugs: &[Drug],
    publications: &[Article],
    trials: &[Article],
) -> Result<MentionsGraph> {
    let mut graph = MentionsGraph::new();

    for drug in drugs {
        let Some(name) = drug.name.as_deref() else {
            debug!(id = %drug.id, "Drug without a name, skipped");
            continue;
        };

        let matcher = DrugMatcher::new(name)?;
        let mentions: Vec<Mention> = publications
            .iter()
            .chain(trials)
            .filter_map(|article| {
                let title = article.title.as_deref()?;
                matcher
                    .is_mentioned_in(title)
                    .then(|| Mention::from_article(article, title))
            })
            .collect();

        if mentions.is_empty() {
            debug!(drug = name, "No mention found");
            continue;
        }

        debug!(drug = name, mentions = mentions.len(), "Drug linked");
        graph.insert(name.to_string(), mentions);
    }

    info!(
        drugs = drugs.len(),
        linked = graph.len(),
        mentions = graph.values().map(Vec::len).sum::<usize>(),
        "Mentions graph built"
    );
    Ok(graph)
}
