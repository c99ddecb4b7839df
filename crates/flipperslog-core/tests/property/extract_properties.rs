use flipperslog_core::extract::extract_result;
use proptest::prelude::*;

fn reply(score: u64, table: &Option<String>) -> String {
    serde_json::json!({ "score": score, "tableName": table }).to_string()
}

fn table_name() -> impl Strategy<Value = Option<String>> {
    proptest::option::of("[A-Za-z0-9 '&:.-]{1,40}")
}

proptest! {
    #[test]
    fn pure_json_is_read_back(score in 0u64..(1u64 << 53), table in table_name()) {
        let result = extract_result(&reply(score, &table)).unwrap();
        prop_assert_eq!(result.score, score as f64);
        prop_assert_eq!(result.table_name, table);
    }

    #[test]
    fn fences_do_not_change_result(
        score in 0u64..(1u64 << 53),
        table in table_name(),
        lang in "(json|JSON|js|)",
    ) {
        let json = reply(score, &table);
        let plain = extract_result(&json).unwrap();
        let fenced = extract_result(&format!("```{}\n{}\n```", lang, json)).unwrap();
        let ticked = extract_result(&format!("`{}`", json)).unwrap();
        prop_assert_eq!(&plain, &fenced);
        prop_assert_eq!(&plain, &ticked);
    }

    #[test]
    fn surrounding_prose_does_not_change_result(
        score in 0u64..(1u64 << 53),
        table in table_name(),
        before in "[A-Za-z0-9 ,.:!?\n]{0,60}",
        after in "[A-Za-z0-9 ,.:!?\n]{0,60}",
    ) {
        let json = reply(score, &table);
        let plain = extract_result(&json).unwrap();
        let wrapped = extract_result(&format!("{}{}{}", before, json, after)).unwrap();
        prop_assert_eq!(plain, wrapped);
    }

    #[test]
    fn text_without_braces_is_rejected(text in "[^{]{0,200}") {
        prop_assert!(extract_result(&text).is_err());
    }

    #[test]
    fn never_panics(text in ".{0,300}") {
        let _ = extract_result(&text);
    }
}
