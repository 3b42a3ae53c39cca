// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Hostname Classifier
 * Admission and wildcard/literal partitioning of raw candidate names
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use crate::types::{Classification, Domain};

/// Classify one raw candidate string extracted by a source adapter.
///
/// A candidate is admitted iff, after trimming and lowercasing, it ends with
/// the target domain and is not the target domain itself. Admitted names
/// starting with `*.` are wildcards; everything else is literal. The two
/// outcomes are mutually exclusive, so any result set built exclusively
/// through this function keeps its literal and wildcard sets disjoint.
///
/// Classification is purely syntactic: a scraped `*.` prefix is taken at
/// face value without verifying that a wildcard record actually resolves.
pub fn classify(raw: &str, domain: &Domain) -> Option<(String, Classification)> {
    let candidate = raw.trim().trim_end_matches('.').to_lowercase();

    if candidate.is_empty() || candidate == domain.as_str() {
        return None;
    }
    if !candidate.ends_with(domain.as_str()) {
        return None;
    }

    let class = if candidate.starts_with("*.") {
        Classification::Wildcard
    } else {
        Classification::Literal
    };

    Some((candidate, class))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn domain() -> Domain {
        Domain::parse("example.com").unwrap()
    }

    #[test]
    fn test_literal_subdomain_admitted() {
        assert_eq!(
            classify("www.example.com", &domain()),
            Some(("www.example.com".to_string(), Classification::Literal))
        );
    }

    #[test]
    fn test_wildcard_subdomain_admitted() {
        assert_eq!(
            classify("*.dev.example.com", &domain()),
            Some(("*.dev.example.com".to_string(), Classification::Wildcard))
        );
    }

    #[test]
    fn test_bare_domain_rejected() {
        assert_eq!(classify("example.com", &domain()), None);
    }

    #[test]
    fn test_foreign_domain_rejected() {
        assert_eq!(classify("other.org", &domain()), None);
        assert_eq!(classify("www.other.org", &domain()), None);
    }

    #[test]
    fn test_case_and_whitespace_normalized() {
        assert_eq!(
            classify("  WWW.Example.COM  ", &domain()),
            Some(("www.example.com".to_string(), Classification::Literal))
        );
    }

    #[test]
    fn test_trailing_dot_stripped_before_matching() {
        assert_eq!(
            classify("mail.example.com.", &domain()),
            Some(("mail.example.com".to_string(), Classification::Literal))
        );
    }

    #[test]
    fn test_empty_and_blank_rejected() {
        assert_eq!(classify("", &domain()), None);
        assert_eq!(classify("   ", &domain()), None);
    }

    // CT logs return a mix of literal names, wildcard patterns, the bare
    // domain, and out-of-scope names in one payload.
    #[test]
    fn test_ct_log_example_partition() {
        let raws = [
            "www.example.com",
            "*.dev.example.com",
            "example.com",
            "other.org",
        ];
        let mut literal = Vec::new();
        let mut wildcard = Vec::new();
        for raw in raws {
            match classify(raw, &domain()) {
                Some((host, Classification::Literal)) => literal.push(host),
                Some((host, Classification::Wildcard)) => wildcard.push(host),
                None => {}
            }
        }
        assert_eq!(literal, vec!["www.example.com"]);
        assert_eq!(wildcard, vec!["*.dev.example.com"]);
        assert_eq!(literal.len() + wildcard.len(), 2);
    }
}
