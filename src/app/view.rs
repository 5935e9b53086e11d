//! Read-only view models handed to the front end

use std::borrow::Cow;

use crate::ai::ArticleSuggestions;
use crate::constants::ARTICLE_MATCH_PREFIX_CHARS;
use crate::support::{Customer, Inquiry, KnowledgeArticle, Priority};
use crate::triage::PriorityLabel;

/// One inbox row, or the header of the open conversation
#[derive(Debug, Clone)]
pub struct InquiryView<'a> {
    pub inquiry: &'a Inquiry,
    pub customer: Option<Cow<'a, Customer>>,
    pub priority: Option<&'a Priority>,
    pub loading_priority: bool,
    pub label: PriorityLabel,
    pub preview: String,
    /// Present only for the selected inquiry
    pub draft: Option<&'a str>,
}

impl InquiryView<'_> {
    pub fn customer_name(&self) -> &str {
        self.customer
            .as_ref()
            .map(|c| c.name.as_str())
            .unwrap_or("Unknown")
    }

    pub fn is_selected(&self) -> bool {
        self.draft.is_some()
    }
}

/// One entry in the knowledge base panel. Suggestions that match no
/// known article keep their title but have no link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleLink {
    pub title: String,
    pub url: Option<String>,
    pub summary: Option<String>,
}

impl From<&KnowledgeArticle> for ArticleLink {
    fn from(article: &KnowledgeArticle) -> Self {
        Self {
            title: article.title.clone(),
            url: Some(article.url.clone()),
            summary: article.summary.clone(),
        }
    }
}

/// Contents of the knowledge base panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticlePanel {
    pub articles: Vec<ArticleLink>,
    /// True when the list is the generic help set rather than suggestions
    pub generic: bool,
    pub error: Option<String>,
}

fn prefix(s: &str) -> String {
    s.chars()
        .take(ARTICLE_MATCH_PREFIX_CHARS)
        .collect::<String>()
        .to_lowercase()
}

/// Match one suggested title against the knowledge base: exact title first
/// (ignoring case), then a shared leading prefix.
pub fn match_article<'a>(
    title: &str,
    knowledge_base: &'a [KnowledgeArticle],
) -> Option<&'a KnowledgeArticle> {
    let wanted = title.trim().to_lowercase();
    knowledge_base
        .iter()
        .find(|a| a.title.to_lowercase() == wanted)
        .or_else(|| {
            let wanted = prefix(&wanted);
            knowledge_base
                .iter()
                .find(|a| prefix(&a.title) == wanted || a.title.to_lowercase().contains(&wanted))
        })
}

/// Turn model suggestions into panel entries. Generic help is shown only
/// when the suggestion failed or came back empty.
pub fn resolve_articles(
    suggestions: &ArticleSuggestions,
    knowledge_base: &[KnowledgeArticle],
    generic_help: &[KnowledgeArticle],
) -> ArticlePanel {
    if suggestions.error.is_some() || suggestions.suggested_articles.is_empty() {
        return ArticlePanel {
            articles: generic_help.iter().map(ArticleLink::from).collect(),
            generic: true,
            error: suggestions.error.clone(),
        };
    }

    let mut articles: Vec<ArticleLink> = Vec::new();
    for title in &suggestions.suggested_articles {
        let link = match match_article(title, knowledge_base) {
            Some(article) => ArticleLink::from(article),
            None => {
                tracing::debug!("No knowledge base article matches {:?}", title);
                ArticleLink {
                    title: title.trim().to_string(),
                    url: None,
                    summary: None,
                }
            }
        };
        if !articles
            .iter()
            .any(|a| a.title.eq_ignore_ascii_case(&link.title))
        {
            articles.push(link);
        }
    }

    ArticlePanel {
        articles,
        generic: false,
        error: None,
    }
}
