//! Property tests for URL list loading.

use proptest::prelude::*;
use std::io::Cursor;
use wcrawl_core::url_list::{self, RejectReason};

fn line_strategy() -> impl Strategy<Value = String> {
    let scheme = prop_oneof![
        Just("http://"),
        Just("https://"),
        Just("ftp://"),
        Just("HTTP://"),
        Just("http:/"),
        Just("htps://"),
        Just(""),
        Just("  https://"),
    ];
    (scheme, "[a-z0-9./:-]{0,40}").prop_map(|(s, rest)| format!("{}{}", s, rest))
}

proptest! {
    #[test]
    fn line_is_kept_iff_it_has_an_accepted_scheme(lines in prop::collection::vec(line_strategy(), 1..40)) {
        let expected: Vec<String> = lines
            .iter()
            .map(|l| l.trim().to_string())
            .filter(|l| l.starts_with("http://") || l.starts_with("https://"))
            .collect();
        let src: String = lines.iter().map(|l| format!("{}\n", l)).collect();

        match url_list::load_from_reader(Cursor::new(src), 1000) {
            Ok(list) => {
                let got: Vec<String> = list.entries().iter().map(|e| e.raw().to_string()).collect();
                prop_assert_eq!(&got, &expected);
                for (i, e) in list.entries().iter().enumerate() {
                    prop_assert_eq!(e.index(), i + 1);
                }
                let non_blank = lines.iter().filter(|l| !l.trim().is_empty()).count();
                prop_assert_eq!(list.diagnostics().len(), non_blank - expected.len());
                prop_assert!(list
                    .diagnostics()
                    .iter()
                    .all(|d| d.reason == RejectReason::InvalidScheme));
            }
            Err(_) => prop_assert!(expected.is_empty()),
        }
    }

    #[test]
    fn limit_keeps_first_m_in_source_order(n in 1usize..60, m in 1usize..60) {
        let src: String = (1..=n).map(|i| format!("https://h.test/{}\n", i)).collect();
        let list = url_list::load_from_reader(Cursor::new(src), m).unwrap();
        let kept = n.min(m);
        prop_assert_eq!(list.len(), kept);
        for (i, e) in list.entries().iter().enumerate() {
            prop_assert_eq!(e.index(), i + 1);
            prop_assert_eq!(e.raw(), format!("https://h.test/{}", i + 1));
        }
        prop_assert_eq!(list.skipped_over_limit(), n - kept);
    }
}
