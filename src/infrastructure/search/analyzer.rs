//! Tokenizer and query parser shared by the search index adapters.
//!
//! Documents and queries are split into lowercase alphanumeric tokens.
//! A query is a list of whitespace-separated terms that must all match;
//! a term ending in `*` matches any token starting with it. An empty query,
//! or one made only of `*`, matches every document.

use std::collections::BTreeSet;

use crate::domain::Entity;

/// One required query term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    Exact(String),
    Prefix(String),
}

impl Term {
    pub fn matches(&self, tokens: &BTreeSet<String>) -> bool {
        match self {
            Term::Exact(t) => tokens.contains(t),
            Term::Prefix(p) => tokens.iter().any(|t| t.starts_with(p.as_str())),
        }
    }
}

/// Parsed search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    All,
    Terms(Vec<Term>),
}

impl Query {
    pub fn parse(raw: &str) -> Self {
        let mut terms = Vec::new();

        for word in raw.split_whitespace() {
            let prefix = word.ends_with('*');
            let mut tokens = tokenize(word.trim_end_matches('*'));
            let last = tokens.pop();
            terms.extend(tokens.into_iter().map(Term::Exact));
            if let Some(last) = last {
                terms.push(if prefix {
                    Term::Prefix(last)
                } else {
                    Term::Exact(last)
                });
            }
        }

        if terms.is_empty() {
            Query::All
        } else {
            Query::Terms(terms)
        }
    }

    pub fn matches(&self, tokens: &BTreeSet<String>) -> bool {
        match self {
            Query::All => true,
            Query::Terms(terms) => terms.iter().all(|t| t.matches(tokens)),
        }
    }
}

/// Lowercase alphanumeric runs of `text`.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Distinct tokens of an entity's searchable text.
pub fn document_tokens<E: Entity>(entity: &E) -> BTreeSet<String> {
    entity
        .searchable_text()
        .iter()
        .flat_map(|text| tokenize(text))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Job, TaskRef};
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn tokens(words: &[&str]) -> BTreeSet<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test_case("Chile", &["chile"] ; "single word")]
    #[test_case("New-York  City", &["new", "york", "city"] ; "punctuation splits")]
    #[test_case("  ", &[] ; "blank")]
    #[test_case("Área 51", &["área", "51"] ; "unicode and digits")]
    fn test_tokenize(text: &str, expected: &[&str]) {
        assert_eq!(tokenize(text), expected.iter().map(|s| s.to_string()).collect::<Vec<_>>());
    }

    #[test_case("" ; "empty")]
    #[test_case("*" ; "star")]
    #[test_case("  *  * " ; "stars and spaces")]
    fn test_match_all_queries(raw: &str) {
        assert_eq!(Query::parse(raw), Query::All);
    }

    #[test]
    fn test_parse_prefix_applies_to_last_token() {
        assert_eq!(
            Query::parse("san-fran*"),
            Query::Terms(vec![
                Term::Exact("san".into()),
                Term::Prefix("fran".into())
            ])
        );
    }

    #[test_case("chile", true ; "exact hit")]
    #[test_case("CHILE", true ; "case insensitive")]
    #[test_case("chi*", true ; "prefix hit")]
    #[test_case("chi", false ; "partial word needs star")]
    #[test_case("chile peru", false ; "all terms required")]
    #[test_case("chile santiago", true ; "two terms present")]
    fn test_query_matches(raw: &str, expected: bool) {
        let doc = tokens(&["chile", "santiago"]);
        assert_eq!(Query::parse(raw).matches(&doc), expected);
    }

    #[test]
    fn test_document_tokens_include_task_titles() {
        let job = Job {
            id: Some(1),
            job_title: Some("Senior Clerk".into()),
            min_salary: Some(1000),
            tasks: vec![TaskRef {
                id: 4,
                title: Some("Filing".into()),
            }],
            ..Default::default()
        };
        assert_eq!(
            document_tokens(&job),
            tokens(&["1000", "clerk", "filing", "senior"])
        );
    }
}
