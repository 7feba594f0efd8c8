//! The concurrent runtime must agree with the sequential core validator.

use std::sync::{Arc, OnceLock};

use lexguard_core::{KnowledgeBase, Validator};
use lexguard_runtime::{RuntimeConfig, RuntimeValidator};
use proptest::prelude::*;

fn knowledge() -> Arc<KnowledgeBase> {
    static KNOWLEDGE: OnceLock<Arc<KnowledgeBase>> = OnceLock::new();
    Arc::clone(KNOWLEDGE.get_or_init(|| {
        Arc::new(KnowledgeBase::builtin().expect("built-in knowledge base loads"))
    }))
}

fn runtime() -> &'static tokio::runtime::Runtime {
    static RUNTIME: OnceLock<tokio::runtime::Runtime> = OnceLock::new();
    RUNTIME.get_or_init(|| {
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .expect("tokio runtime builds")
    })
}

fn text() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            Just("pidana"),
            Just("KUHP Pasal 362"),
            Just("dilarang"),
            Just("diperbolehkan"),
            Just("bagaimana cara"),
            Just("dijamin menang"),
            Just("resep"),
            Just("selalu"),
            Just("."),
            Just("adalah"),
        ],
        0..30,
    )
    .prop_map(|words| words.join(" "))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn concurrent_matches_sequential(query in text(), response in text()) {
        let kb = knowledge();
        let validator = RuntimeValidator::new(Arc::clone(&kb), RuntimeConfig::default().with_cache_capacity(0));

        let concurrent = runtime().block_on(validator.validate(&query, &response));
        let sequential = Validator::new(&kb).validate(&query, &response);

        prop_assert!(concurrent.is_equivalent(&sequential));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_callers_share_one_validator() {
    let validator = Arc::new(RuntimeValidator::new(knowledge(), RuntimeConfig::default()));
    let query = "Apa sanksi pidana untuk pencurian?";
    let answer = "Berdasarkan KUHP Pasal 362, pencurian diancam dengan pidana penjara paling lama lima tahun...";

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let validator = Arc::clone(&validator);
            tokio::spawn(async move { validator.validate(query, answer).await })
        })
        .collect();

    for handle in handles {
        let result = handle.await.expect("task completes");
        assert!(result.is_valid);
        assert_eq!(result.sources, vec!["KUHP Pasal 362"]);
    }
}
