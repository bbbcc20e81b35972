// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{scan_service, seed_from, test_patterns};
use scanrs::domain::models::artifact::ArtifactCategory;
use scanrs::domain::models::scan::{DeepScanConfig, ScanStatus};
use scanrs::domain::repositories::checkpoint_repository::CheckpointRepository;
use scanrs::domain::services::deep_scan_service::DeepScanService;
use scanrs::engines::reqwest_engine::ReqwestEngine;
use scanrs::infrastructure::repositories::memory_checkpoint_repository::MemoryCheckpointRepository;
use std::sync::Arc;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const INDEX_HTML: &str = r#"<html><body>
<script src="/static/app.js"></script>
<a href="/contact">联系我们</a>
<p>备用站点 backup.example.com</p>
<img src="/logo.png">
</body></html>"#;

const APP_JS: &str = r#"const loginApi = "/api/login";
const db_password = "hunter2";
"#;

const CONTACT_HTML: &str = r#"<html><body>
<p>客服电话 13812345678</p>
<p>邮箱 security@example.com</p>
<a href="/about">关于</a>
</body></html>"#;

async fn mount_page(server: &MockServer, route: &str, body: &str, content_type: &str, hits: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            // set_body_string 会把 content-type 强制成 text/plain，
            // 需要用 set_body_raw 指定
            ResponseTemplate::new(200)
                .set_body_raw(body, content_type)
                .insert_header("content-type", content_type),
        )
        .expect(hits)
        .mount(server)
        .await;
}

/// 两层站点全量扫描：起点页 -> 脚本与联系页 -> 接口。
/// 深度边界外的页面一次都不该被请求。
#[tokio::test]
async fn test_two_layer_scan_collects_artifacts_within_depth() {
    let server = MockServer::start().await;
    mount_page(&server, "/", INDEX_HTML, "text/html", 1).await;
    mount_page(&server, "/static/app.js", APP_JS, "application/javascript", 1).await;
    mount_page(&server, "/contact", CONTACT_HTML, "text/html", 1).await;
    mount_page(&server, "/api/login", r#"{"status":"ok"}"#, "application/json", 1).await;
    mount_page(&server, "/about", "<html></html>", "text/html", 0).await;

    let origin = Url::parse(&server.uri()).unwrap();
    let patterns = test_patterns();
    let seed = seed_from(INDEX_HTML, &patterns);

    let checkpoints = Arc::new(MemoryCheckpointRepository::new());
    let repo: Arc<dyn CheckpointRepository> = checkpoints.clone();
    let service = scan_service(Arc::new(ReqwestEngine), repo, 2, 4);

    let report = service.run_deep_scan(&origin, &seed).await;

    assert_eq!(report.status, ScanStatus::Completed);
    assert_eq!(report.visited_count, 4);
    assert_eq!(report.depth_reached, 2);

    let aggregate = &report.aggregate;
    assert!(aggregate
        .get(&ArtifactCategory::Phone)
        .is_some_and(|values| values.contains("13812345678")));
    assert!(aggregate
        .get(&ArtifactCategory::Email)
        .is_some_and(|values| values.contains("security@example.com")));
    assert!(aggregate
        .get(&ArtifactCategory::Domain)
        .is_some_and(|values| values.contains("backup.example.com")));
    assert!(aggregate
        .get(&ArtifactCategory::Credential)
        .is_some_and(|values| values.iter().any(|v| v.contains("hunter2"))));
    assert!(aggregate
        .get(&ArtifactCategory::JsFile)
        .is_some_and(|values| values.contains("/static/app.js")));
    assert!(aggregate
        .get(&ArtifactCategory::AbsoluteApi)
        .is_some_and(|values| values.contains("/api/login")));
    assert!(aggregate
        .get(&ArtifactCategory::ImageFile)
        .is_some_and(|values| values.contains("/logo.png")));

    // 完成状态连同最终聚合进入检查点
    let saved = checkpoints
        .load_checkpoint(origin.as_str())
        .await
        .unwrap()
        .expect("completion should persist the final state");
    assert_eq!(saved.status, ScanStatus::Completed);
    assert_eq!(saved.visited.len(), 4);
    assert_eq!(saved.aggregate.total(), report.aggregate.total());
}

/// 两个脚本都引用同一个接口时，该接口只会被抓取一次
#[tokio::test]
async fn test_shared_target_dispatched_once() {
    let server = MockServer::start().await;
    let index = r#"<html><head>
<script src="/a.js"></script>
<script src="/b.js"></script>
</head></html>"#;
    mount_page(&server, "/", index, "text/html", 1).await;
    mount_page(&server, "/a.js", r#"fetch("/shared/data.json");"#, "application/javascript", 1)
        .await;
    mount_page(&server, "/b.js", r#"load("/shared/data.json");"#, "application/javascript", 1)
        .await;
    mount_page(&server, "/shared/data.json", "{}", "application/json", 1).await;

    let origin = Url::parse(&server.uri()).unwrap();
    let patterns = test_patterns();
    let seed = seed_from(index, &patterns);

    let checkpoints: Arc<dyn CheckpointRepository> = Arc::new(MemoryCheckpointRepository::new());
    let service = scan_service(Arc::new(ReqwestEngine), checkpoints, 2, 4);
    let report = service.run_deep_scan(&origin, &seed).await;

    assert_eq!(report.status, ScanStatus::Completed);
    assert_eq!(report.visited_count, 4);
}

/// 聚合结果与并发度无关
#[tokio::test]
async fn test_aggregate_is_order_independent() {
    let server = MockServer::start().await;
    mount_page(&server, "/", INDEX_HTML, "text/html", 2).await;
    mount_page(&server, "/static/app.js", APP_JS, "application/javascript", 2).await;
    mount_page(&server, "/contact", CONTACT_HTML, "text/html", 2).await;
    mount_page(&server, "/api/login", r#"{"status":"ok"}"#, "application/json", 2).await;

    let origin = Url::parse(&server.uri()).unwrap();
    let patterns = test_patterns();
    let seed = seed_from(INDEX_HTML, &patterns);

    let serial_repo: Arc<dyn CheckpointRepository> = Arc::new(MemoryCheckpointRepository::new());
    let serial = scan_service(Arc::new(ReqwestEngine), serial_repo, 2, 1)
        .run_deep_scan(&origin, &seed)
        .await;

    let parallel_repo: Arc<dyn CheckpointRepository> = Arc::new(MemoryCheckpointRepository::new());
    let parallel = scan_service(Arc::new(ReqwestEngine), parallel_repo, 2, 8)
        .run_deep_scan(&origin, &seed)
        .await;

    assert_eq!(serial.aggregate, parallel.aggregate);
    assert_eq!(serial.visited_count, parallel.visited_count);
}

/// 抓取失败按无内容处理，扫描照常完成
#[tokio::test]
async fn test_fetch_failure_degrades_to_empty_content() {
    let server = MockServer::start().await;
    let index = r#"<html><body>
<script src="/missing.js"></script>
<a href="/ok">ok</a>
</body></html>"#;
    mount_page(&server, "/", index, "text/html", 1).await;
    mount_page(&server, "/ok", "<html><p>fine</p></html>", "text/html", 1).await;
    Mock::given(method("GET"))
        .and(path("/missing.js"))
        .respond_with(ResponseTemplate::new(200).set_delay(std::time::Duration::from_secs(30)))
        .mount(&server)
        .await;

    let origin = Url::parse(&server.uri()).unwrap();
    let patterns = test_patterns();
    let seed = seed_from(index, &patterns);

    let checkpoints: Arc<dyn CheckpointRepository> = Arc::new(MemoryCheckpointRepository::new());
    let config = DeepScanConfig {
        fetch_timeout_secs: 1,
        concurrency: 2,
        ..DeepScanConfig::default()
    };
    let service = DeepScanService::new(Arc::new(ReqwestEngine), patterns.clone(), checkpoints, config);
    let report = service.run_deep_scan(&origin, &seed).await;

    // 超时的脚本不计入成功访问，但整体状态仍是完成
    assert_eq!(report.status, ScanStatus::Completed);
    assert!(report.visited_count >= 2);
}
