use bson::doc;
use chrono::DateTime;
use facility_store::{
    FacilityFilters, FacilitySource, FacilityStore, InMemoryFacilityStore, Predicate,
    build_predicate, decode_token, encode_token,
};
use facility_store::model::Facility;
use log::LevelFilter;

fn init_logger() {
    let _ = env_logger::builder()
        .filter_level(LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

fn facility(frs_id: &str, name: &str, state: &str, source_type: &str, created: i64) -> Facility {
    Facility {
        frs_id: Some(frs_id.to_string()),
        name: Some(name.to_string()),
        state: Some(state.to_string()),
        source: Some(FacilitySource {
            source_type: Some(source_type.to_string()),
            ..Default::default()
        }),
        created_at: DateTime::from_timestamp(created, 0),
        ..Default::default()
    }
}

fn sample_store() -> InMemoryFacilityStore {
    InMemoryFacilityStore::new(vec![
        facility("110000000001", "Harbor Refinery", "CA", "air", 100),
        facility("110000000002", "Valley Water Works", "CA", "cwa", 200),
        facility("110000000003", "Lone Star Chemical", "TX", "rcra", 300),
        facility("110000000004", "Bay Area Power", "CA", "air", 400),
        facility("110000000005", "Empire Plating", "NY", "rcra", 500),
    ])
}

/// Walks every page of a filtered listing the way an API client would,
/// feeding each continuation token back in.
#[tokio::test]
async fn test_paging_through_filtered_results() {
    init_logger();
    let store = sample_store();
    let filters = FacilityFilters::from_pairs([("state", "ca")]);
    let predicate = build_predicate(&filters);
    let limit = 2;

    let mut token: Option<String> = None;
    let mut seen = Vec::new();
    loop {
        let offset = token.as_deref().and_then(decode_token).unwrap_or(0);
        let mut page = store.find_page(&predicate, offset, limit + 1).await.unwrap();
        let has_more = page.len() as u64 > limit;
        page.truncate(limit as usize);
        seen.extend(page.into_iter().filter_map(|f| f.frs_id));
        if !has_more {
            break;
        }
        token = Some(encode_token(offset + limit));
    }

    assert_eq!(
        seen,
        vec!["110000000004", "110000000002", "110000000001"]
    );
}

#[tokio::test]
async fn test_count_respects_predicate() {
    let store = sample_store();

    let everything = store.count(&Predicate::everything()).await.unwrap();
    assert_eq!(everything, 5);

    let rcra = build_predicate(&FacilityFilters::from_pairs([("type", "RCRA")]));
    assert_eq!(store.count(&rcra).await.unwrap(), 2);
}

#[tokio::test]
async fn test_identifier_lookup_prefers_exact_id_or_name() {
    let store = sample_store();

    let by_id = store
        .find_first(&Predicate::by_identifier("110000000003"))
        .await
        .unwrap();
    assert_eq!(
        by_id.and_then(|f| f.name).as_deref(),
        Some("Lone Star Chemical")
    );

    let by_name = store
        .find_first(&Predicate::by_identifier("plating"))
        .await
        .unwrap();
    assert_eq!(by_name.and_then(|f| f.frs_id).as_deref(), Some("110000000005"));

    let missing = store
        .find_first(&Predicate::by_identifier("nowhere"))
        .await
        .unwrap();
    assert!(missing.is_none());
}

/// A record read from the store must satisfy the same predicate that
/// selected it, including name matches found only in the payload.
#[tokio::test]
async fn test_stored_documents_match_their_filters() {
    init_logger();
    let stored = vec![
        doc! {
            "FRS_ID": 110000777001_i64,
            "FacilityName": "Plant 7",
            "State": "or",
            "facilityData": { "facilityName": "Willamette Pulp & Paper" },
            "source": { "type": "cwa" },
            "createdAt": bson::DateTime::from_millis(2_000),
        },
        doc! {
            "FRS_ID": "110000777002",
            "FacilityName": "Willamette Grain",
            "State": "WA",
            "source": { "type": "air" },
            "createdAt": bson::DateTime::from_millis(1_000),
        },
    ];
    let records: Vec<Facility> = stored
        .into_iter()
        .map(|document| bson::from_document(document).unwrap())
        .collect();
    let store = InMemoryFacilityStore::new(records);

    let filters = FacilityFilters::from_pairs([("name", "willamette"), ("state", "OR")]);
    let page = store
        .find_page(&build_predicate(&filters), 0, 10)
        .await
        .unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].frs_id.as_deref(), Some("110000777001"));

    let filters = FacilityFilters::from_pairs([("name", "pulp & paper"), ("type", "CWA")]);
    assert_eq!(store.count(&build_predicate(&filters)).await.unwrap(), 1);
}
