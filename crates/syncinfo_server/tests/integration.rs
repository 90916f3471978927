//! End-to-end wire scenarios over in-memory collaborators.

use serde_json::Value;
use std::sync::Arc;
use syncinfo_core::{
    CancelToken, EntryCodec, FullProvider, IncrementalProvider, MarkerTracker, MemoryKeyLister,
    MemoryShardedLog, ProviderRegistry, SipProvider,
};
use syncinfo_server::{Method, SipRequest, SipService};
use syncinfo_types::{DataChangeInfo, EntryPayload, MetaSnapshotInfo, ProviderId, Timestamp};

struct Fixture {
    service: SipService,
    lister: Arc<MemoryKeyLister>,
    log: Arc<MemoryShardedLog>,
}

/// One FULL provider (`data.full`, 1 shard) and one INC provider
/// (`data.inc`, 4 shards), both initially empty.
fn fixture() -> Fixture {
    let lister = Arc::new(MemoryKeyLister::new());
    let log = Arc::new(MemoryShardedLog::new(4));

    let registry = ProviderRegistry::builder()
        .register(SipProvider::full(
            ProviderId::new("data.full", "data"),
            FullProvider::new("data.full", EntryCodec::MetaSnapshot, Arc::clone(&lister) as _),
        ))
        .unwrap()
        .register(SipProvider::incremental(
            ProviderId::new("data.inc", "data"),
            IncrementalProvider::new("data.inc", EntryCodec::DataChange, Arc::clone(&log) as _),
        ))
        .unwrap()
        .build();

    Fixture {
        service: SipService::new(Arc::new(registry), MarkerTracker::in_memory()),
        lister,
        log,
    }
}

fn get(service: &SipService, req: SipRequest) -> Value {
    service.handle(&req, &CancelToken::new()).unwrap()
}

fn snapshot(id: &str) -> Vec<u8> {
    MetaSnapshotInfo {
        section: "bucket.instance".to_string(),
        id: id.to_string(),
    }
    .encode()
    .unwrap()
}

fn change(key: &str) -> Vec<u8> {
    DataChangeInfo {
        key: key.to_string(),
        num_shards: 16,
        ..Default::default()
    }
    .encode()
    .unwrap()
}

fn fetch(provider: &str, shard: u32, marker: Option<&str>, max: usize) -> SipRequest {
    let mut req = SipRequest::new(Method::Get)
        .with_param("provider", provider)
        .with_param("shard-id", shard.to_string())
        .with_param("max", max.to_string());
    if let Some(marker) = marker {
        req = req.with_param("marker", marker);
    }
    req
}

#[test]
fn full_provider_empty_then_populated() {
    let fx = fixture();

    let value = get(&fx.service, fetch("data.full", 0, None, 10));
    assert_eq!(value["entries"].as_array().unwrap().len(), 0);
    assert_eq!(value["more"], false);
    assert_eq!(value["done"], true);

    for i in 0..3 {
        fx.lister.insert(format!("b{i}"), snapshot(&format!("b{i}")));
    }
    let value = get(&fx.service, fetch("data.full", 0, None, 10));
    assert_eq!(value["entries"].as_array().unwrap().len(), 3);
    assert_eq!(value["done"], true);
}

#[test]
fn incremental_paginates_and_resumes() {
    let fx = fixture();

    // empty shard 2
    let value = get(&fx.service, fetch("data.inc", 2, Some(""), 5));
    assert_eq!(value["entries"].as_array().unwrap().len(), 0);
    assert_eq!(value["more"], false);
    assert_eq!(value["done"], false);

    for i in 0..7 {
        fx.log
            .append(2, change(&format!("k{i}")), Timestamp(i))
            .unwrap();
    }

    let value = get(&fx.service, fetch("data.inc", 2, Some(""), 5));
    let entries = value["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 5);
    assert_eq!(value["more"], true);

    let cursor = entries[4]["key"].as_str().unwrap().to_string();
    let value = get(&fx.service, fetch("data.inc", 2, Some(&cursor), 5));
    assert_eq!(value["entries"].as_array().unwrap().len(), 2);
    assert_eq!(value["more"], false);
}

#[test]
fn trim_isolates_shards() {
    let fx = fixture();
    let m0 = fx.log.append(0, change("a"), Timestamp(1)).unwrap();
    fx.log.append(1, change("b"), Timestamp(2)).unwrap();

    let value = fx
        .service
        .handle(
            &SipRequest::new(Method::Delete)
                .with_param("provider", "data.inc")
                .with_param("stage-id", "data.inc")
                .with_param("shard-id", "0")
                .with_param("marker", m0.as_str()),
            &CancelToken::new(),
        )
        .unwrap();
    assert!(value.is_null());

    assert_eq!(fx.log.shard_len(0).unwrap(), 0);
    assert_eq!(fx.log.shard_len(1).unwrap(), 1);
    // fetch on the untouched shard still sees its record
    let value = get(&fx.service, fetch("data.inc", 1, None, 10));
    assert_eq!(value["entries"].as_array().unwrap().len(), 1);
}

#[test]
fn trim_out_of_range_shard_is_400() {
    let fx = fixture();
    let err = fx
        .service
        .handle(
            &SipRequest::new(Method::Delete)
                .with_param("provider", "data.inc")
                .with_param("stage-id", "data.inc")
                .with_param("shard-id", "99")
                .with_param("marker", "m"),
            &CancelToken::new(),
        )
        .unwrap_err();
    assert_eq!(err.status(), 400);
}

#[test]
fn empty_target_id_is_rejected() {
    let fx = fixture();
    let body = serde_json::to_vec(&serde_json::json!({
        "target_id": "",
        "marker": "m1",
    }))
    .unwrap();
    let err = fx
        .service
        .handle(
            &SipRequest::new(Method::Put)
                .with_param("provider", "data.inc")
                .with_flag("marker-info")
                .with_param("stage-id", "data.inc")
                .with_param("shard-id", "0")
                .with_body(body),
            &CancelToken::new(),
        )
        .unwrap_err();
    assert_eq!(err.status(), 400);
}

#[test]
fn consumers_track_markers_independently() {
    let fx = fixture();
    let set = |target: &str, marker: &str| {
        let body = serde_json::to_vec(&serde_json::json!({
            "target_id": target,
            "marker": marker,
            "timestamp": 1,
        }))
        .unwrap();
        fx.service
            .handle(
                &SipRequest::new(Method::Put)
                    .with_param("provider", "data.inc")
                    .with_flag("marker-info")
                    .with_param("stage-id", "data.inc")
                    .with_param("shard-id", "0")
                    .with_body(body),
                &CancelToken::new(),
            )
            .unwrap();
    };

    set("A", "m1");
    set("B", "m2");

    let info = get(
        &fx.service,
        SipRequest::new(Method::Get)
            .with_param("provider", "data.inc")
            .with_flag("marker-info")
            .with_param("stage-id", "data.inc")
            .with_param("shard-id", "0"),
    );
    let targets = &info["targets"];
    assert_eq!(targets["A"]["marker"], "m1");
    assert_eq!(targets["B"]["marker"], "m2");

    // removing A leaves B untouched
    fx.service
        .handle(
            &SipRequest::new(Method::Delete)
                .with_param("provider", "data.inc")
                .with_param("stage-id", "data.inc")
                .with_param("shard-id", "0")
                .with_param("target-id", "A"),
            &CancelToken::new(),
        )
        .unwrap();

    let info = get(
        &fx.service,
        SipRequest::new(Method::Get)
            .with_param("provider", "data.inc")
            .with_flag("marker-info")
            .with_param("stage-id", "data.inc")
            .with_param("shard-id", "0"),
    );
    let targets = &info["targets"];
    assert!(targets.get("A").is_none());
    assert_eq!(targets["B"]["marker"], "m2");
}

#[test]
fn status_reflects_log_head() {
    let fx = fixture();
    let head = fx.log.append(3, change("k"), Timestamp(42)).unwrap();

    let value = get(
        &fx.service,
        SipRequest::new(Method::Get)
            .with_param("provider", "data.inc")
            .with_flag("status")
            .with_param("stage-id", "data.inc")
            .with_param("shard-id", "3"),
    );
    assert_eq!(value["markers"]["start"]["marker"], "");
    assert_eq!(value["markers"]["current"]["marker"], head.as_str());
    assert_eq!(value["markers"]["current"]["timestamp"], 42);
    assert_eq!(value["disabled"], false);
}

#[test]
fn listing_and_info_expose_topology() {
    let fx = fixture();

    let value = get(&fx.service, SipRequest::new(Method::Get));
    let providers = value["providers"].as_array().unwrap();
    assert_eq!(providers.len(), 2);

    let value = get(
        &fx.service,
        SipRequest::new(Method::Get)
            .with_param("provider", "data.inc")
            .with_flag("info"),
    );
    assert_eq!(value["info"]["stages"][0]["num_shards"], 4);
    assert_eq!(value["info"]["stages"][0]["type"], "inc");
    assert_eq!(value["info"]["first_stage"], "data.inc");
}

#[test]
fn full_stage_completion_is_stable() {
    let fx = fixture();
    for i in 0..4 {
        fx.lister.insert(format!("b{i}"), snapshot(&format!("b{i}")));
    }

    // walk to completion
    let value = get(&fx.service, fetch("data.full", 0, None, 100));
    assert_eq!(value["done"], true);
    let entries = value["entries"].as_array().unwrap();
    let last = entries.last().unwrap()["key"].as_str().unwrap().to_string();

    // no further call yields new entries
    let value = get(&fx.service, fetch("data.full", 0, Some(&last), 100));
    assert_eq!(value["entries"].as_array().unwrap().len(), 0);
    assert_eq!(value["done"], true);
}
