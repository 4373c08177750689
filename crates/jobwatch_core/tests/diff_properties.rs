//! Cross-run properties of the diff, checked over a fixed set of varied inputs.

use std::collections::HashSet;

use jobwatch_core::{compute_new_jobs, CompanyRegistry, CurrentScrapes, KnownJobsState};

struct Case {
    registry: CompanyRegistry,
    scrapes: CurrentScrapes,
    known: KnownJobsState,
}

fn cases() -> Vec<Case> {
    let registry: CompanyRegistry = [
        ("Acme", "https://acme.example/jobs"),
        ("Beta", "https://beta.example/careers"),
        ("Gamma", "https://gamma.example/work"),
    ]
    .into_iter()
    .collect();

    let scrape_sets: Vec<Vec<(&str, Vec<&str>)>> = vec![
        vec![],
        vec![("Acme", vec!["/job/1", "/job/2"])],
        vec![
            ("Acme", vec!["/job/2", "/job/3", "/job/2"]),
            ("Beta", vec![]),
            ("Gamma", vec!["https://gamma.example/job?id=7"]),
        ],
        vec![("Beta", vec!["/jobs/a", "/jobs/b", "/jobs/c"])],
    ];
    let known_sets: Vec<Vec<(&str, Vec<&str>)>> = vec![
        vec![],
        vec![("Acme", vec!["/job/1"])],
        vec![("Acme", vec!["/job/2"]), ("Beta", vec!["/jobs/b"])],
        vec![("Legacy", vec!["/job/x"]), ("Gamma", vec![])],
    ];

    let mut out = Vec::new();
    for scrapes in &scrape_sets {
        for known in &known_sets {
            out.push(Case {
                registry: registry.clone(),
                scrapes: scrapes
                    .iter()
                    .map(|(company, links)| {
                        (
                            company.to_string(),
                            links.iter().map(|link| link.to_string()).collect(),
                        )
                    })
                    .collect(),
                known: known
                    .iter()
                    .map(|(company, links)| (*company, links.iter().copied()))
                    .collect(),
            });
        }
    }
    out
}

#[test]
fn second_pass_over_same_scrapes_finds_nothing() {
    for case in cases() {
        let (_, after_first) = compute_new_jobs(&case.registry, &case.scrapes, case.known);
        let (second, after_second) =
            compute_new_jobs(&case.registry, &case.scrapes, after_first.clone());

        assert!(second.is_empty(), "second digest was {second:?}");
        assert_eq!(after_second, after_first);
    }
}

#[test]
fn every_unknown_scraped_link_is_reported_in_order() {
    for case in cases() {
        let (digest, _) = compute_new_jobs(&case.registry, &case.scrapes, case.known.clone());

        for company in case.registry.names() {
            let expected: Vec<&str> = case
                .scrapes
                .get(company)
                .into_iter()
                .flatten()
                .map(String::as_str)
                .filter(|link| !case.known.contains(company, link))
                .collect();
            let reported: Vec<&str> = digest
                .links(company)
                .unwrap_or_default()
                .iter()
                .map(String::as_str)
                .collect();
            assert_eq!(reported, expected, "company {company}");
        }
    }
}

#[test]
fn known_links_are_never_reported_again() {
    for case in cases() {
        let (digest, _) = compute_new_jobs(&case.registry, &case.scrapes, case.known.clone());

        for (company, link) in digest.entries() {
            assert!(
                !case.known.contains(company, link),
                "{company} re-reported {link}"
            );
        }
    }
}

#[test]
fn known_links_only_grow() {
    for case in cases() {
        let (digest, after) = compute_new_jobs(&case.registry, &case.scrapes, case.known.clone());

        for (company, before_links) in case.known.companies() {
            let after_links: HashSet<&String> =
                after.links(company).unwrap_or_default().iter().collect();
            for link in before_links {
                assert!(after_links.contains(link), "{company} lost {link}");
            }
        }
        // Everything reported is now known.
        for (company, link) in digest.entries() {
            assert!(after.contains(company, link));
        }
        for company in case.registry.names() {
            assert!(after.has_company(company));
        }
    }
}
