mod common;

use ango_scraper::constants::{FALLBACK_COMPANY, JOBS_TABLE};
use ango_scraper::pipeline::{run_jobs, JobsOptions};
use ango_scraper::registry::{AdapterRegistry, JobSource};
use ango_scraper::storage::InMemorySink;
use common::{context, FakeHttp, FlakySelectSink};
use serde_json::json;
use std::sync::Arc;

const ADAPTERS: &str = r#"
[[jobs]]
name = "Vagas Teste"
base_url = "https://vagas.test/"
list_url = "https://vagas.test/lista"
job_card_selector = ".job"
title_selector = "h2"
company_selector = ".company"
location_selector = ".location"
detail_enabled = true
detail_description_selector = ".entry-content"
detail_requirements_selector = ".requirements"
request_delay_range = [0.0, 0.0]

[[jobs]]
name = "Concursos Teste"
base_url = "https://concursos.test"
list_url = "https://concursos.test/abertos"
job_card_selector = "article"
title_selector = "h3"
fixed_company = "Estado Angolano (INEFOP)"
fixed_category = "Concurso Público"
request_delay_range = [0.0, 0.0]
"#;

const VAGAS_LIST: &str = r#"<html><body>
<div class="job"><h2>Engenheiro Civil</h2><a href="/vaga/1">Ver vaga</a></div>
</body></html>"#;

const VAGAS_DETAIL: &str = r#"<html><body>
<div class="entry-content"><p>Obra em Luanda.</p></div>
<ul class="requirements"><li>- Licenciatura em Engenharia Civil</li><li>• 3 anos de experiência</li></ul>
</body></html>"#;

fn sources() -> Vec<JobSource> {
    AdapterRegistry::from_toml_str(ADAPTERS).unwrap().jobs
}

fn no_pause() -> JobsOptions {
    JobsOptions {
        max_total: 100,
        per_cycle: 5,
    }
}

#[tokio::test]
async fn test_job_card_end_to_end() {
    let http = Arc::new(
        FakeHttp::new()
            .page("https://vagas.test/lista", VAGAS_LIST)
            .page("https://vagas.test/vaga/1", VAGAS_DETAIL),
    );
    let sink = InMemorySink::new();
    let ctx = context(http.clone(), Arc::new(sink.clone()));

    let report = run_jobs(&ctx, &sources()[..1], no_pause()).await;

    let rows = sink.rows(JOBS_TABLE);
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row["title"], json!("Engenheiro Civil"));
    assert_eq!(row["company"], json!(FALLBACK_COMPANY));
    assert_eq!(row["location"], json!("Angola"));
    assert_eq!(row["categoria"], json!("Engenharia"));
    assert_eq!(row["status"], json!("pendente"));
    assert_eq!(row["source_url"], json!("https://vagas.test/vaga/1"));
    assert_eq!(row["description"], json!("Obra em Luanda."));
    assert_eq!(
        row["requirements"],
        json!(["Licenciatura em Engenharia Civil", "3 anos de experiência"])
    );
    assert_eq!(
        row["application_email"],
        json!("Candidatar via: https://vagas.test/vaga/1")
    );
    assert_eq!(
        row["imagem_url"],
        json!("https://img.icons8.com/color/144/engineering.png")
    );
    assert_eq!(report.totals().saved, 1);
}

#[tokio::test]
async fn test_second_pass_skips_known_url() {
    let http = Arc::new(
        FakeHttp::new()
            .page("https://vagas.test/lista", VAGAS_LIST)
            .page("https://vagas.test/vaga/1", VAGAS_DETAIL),
    );
    let sink = InMemorySink::new();
    let ctx = context(http.clone(), Arc::new(sink.clone()));

    run_jobs(&ctx, &sources()[..1], no_pause()).await;
    let second = run_jobs(&ctx, &sources()[..1], no_pause()).await;

    assert_eq!(sink.rows(JOBS_TABLE).len(), 1);
    let totals = second.totals();
    assert_eq!(totals.saved, 0);
    assert_eq!(totals.skipped_duplicate, 1);
}

#[tokio::test]
async fn test_fixed_company_and_category_without_detail() {
    let http = Arc::new(FakeHttp::new().page(
        "https://concursos.test/abertos",
        r#"<article><h3>Técnico de Informática</h3><a href="/c/42">Edital</a></article>"#,
    ));
    let sink = InMemorySink::new();
    let ctx = context(http.clone(), Arc::new(sink.clone()));

    run_jobs(&ctx, &sources()[1..], no_pause()).await;

    let rows = sink.rows(JOBS_TABLE);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["company"], json!("Estado Angolano (INEFOP)"));
    assert_eq!(rows[0]["categoria"], json!("Concurso Público"));
    assert_eq!(rows[0]["description"], json!(""));
    // detail_enabled is off: only the listing page was requested
    assert_eq!(http.requests().len(), 1);
}

#[tokio::test]
async fn test_composite_duplicate_is_skipped() {
    let http = Arc::new(FakeHttp::new().page(
        "https://concursos.test/abertos",
        r#"<article><h3>Técnico Superior</h3><a href="/c/2">Edital</a></article>"#,
    ));
    let sink = InMemorySink::new().with_rows(
        JOBS_TABLE,
        vec![json!({
            "title": "Técnico Superior",
            "company": "Estado Angolano (INEFOP)",
            "source_url": "https://concursos.test/c/1"
        })],
    );
    let ctx = context(http, Arc::new(sink.clone()));

    let report = run_jobs(&ctx, &sources()[1..], no_pause()).await;

    assert_eq!(sink.rows(JOBS_TABLE).len(), 1);
    assert_eq!(report.totals().skipped_duplicate, 1);
}

#[tokio::test]
async fn test_composite_duplicate_skips_detail_fetch() {
    let http = Arc::new(FakeHttp::new().page(
        "https://vagas.test/lista",
        r#"<div class="job"><h2>Engenheiro Civil</h2><span class="company">Sonangol</span>
           <a href="/vaga/2">Ver vaga</a></div>"#,
    ));
    let sink = InMemorySink::new().with_rows(
        JOBS_TABLE,
        vec![json!({
            "title": "Engenheiro Civil",
            "company": "Sonangol",
            "source_url": "https://vagas.test/vaga/1"
        })],
    );
    let ctx = context(http.clone(), Arc::new(sink.clone()));

    let report = run_jobs(&ctx, &sources()[..1], no_pause()).await;

    assert_eq!(report.totals().skipped_duplicate, 1);
    assert!(!http.requested("https://vagas.test/vaga/2"));
    assert_eq!(sink.rows(JOBS_TABLE).len(), 1);
}

#[tokio::test]
async fn test_round_robin_respects_cycle_and_total_limits() {
    let list = |prefix: &str| {
        (1..=3)
            .map(|i| format!(r#"<div class="job"><h2>Pasteleiro {prefix}{i}</h2><a href="/{prefix}/{i}">x</a></div>"#))
            .collect::<String>()
    };
    let mut registry = AdapterRegistry::from_toml_str(ADAPTERS).unwrap();
    let mut second = registry.jobs[0].clone();
    second.name = "Outra Bolsa".to_string();
    second.base_url = "https://outra.test".to_string();
    second.list_url = "https://outra.test/lista".to_string();
    second.detail_enabled = false;
    registry.jobs[0].detail_enabled = false;
    let boards = vec![registry.jobs[0].clone(), second];

    let http = Arc::new(
        FakeHttp::new()
            .page("https://vagas.test/lista", &list("a"))
            .page("https://outra.test/lista", &list("b")),
    );
    let sink = InMemorySink::new();
    let ctx = context(http.clone(), Arc::new(sink.clone()));

    let report = run_jobs(
        &ctx,
        &boards,
        JobsOptions {
            max_total: 5,
            per_cycle: 2,
        },
    )
    .await;

    let titles: Vec<String> = sink
        .rows(JOBS_TABLE)
        .iter()
        .map(|r| r["title"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        titles,
        vec!["Pasteleiro a1", "Pasteleiro a2", "Pasteleiro b1", "Pasteleiro b2", "Pasteleiro a3"]
    );
    assert_eq!(report.source("Vagas Teste").unwrap().stats.saved, 3);
    assert_eq!(report.source("Outra Bolsa").unwrap().stats.saved, 2);
    // Listing pages are fetched once and reused across cycles
    let list_fetches = http
        .requests()
        .iter()
        .filter(|(url, _)| url == "https://vagas.test/lista")
        .count();
    assert_eq!(list_fetches, 1);
}

#[tokio::test]
async fn test_unreachable_board_does_not_stop_the_run() {
    let http = Arc::new(FakeHttp::new().status("https://vagas.test/lista", 403).page(
        "https://concursos.test/abertos",
        r#"<article><h3>Técnico Médio</h3><a href="/c/7">Edital</a></article>"#,
    ));
    let sink = InMemorySink::new();
    let ctx = context(http, Arc::new(sink.clone()));

    let report = run_jobs(&ctx, &sources(), no_pause()).await;

    assert!(report.source("Vagas Teste").unwrap().is_failed());
    assert_eq!(report.source("Concursos Teste").unwrap().stats.saved, 1);
    assert_eq!(sink.rows(JOBS_TABLE).len(), 1);
}

#[tokio::test]
async fn test_failed_duplicate_check_is_fail_open() {
    let http = Arc::new(
        FakeHttp::new()
            .page("https://vagas.test/lista", VAGAS_LIST)
            .page("https://vagas.test/vaga/1", VAGAS_DETAIL),
    );
    let sink = FlakySelectSink::default();
    let ctx = context(http, Arc::new(sink.clone()));

    let report = run_jobs(&ctx, &sources()[..1], no_pause()).await;

    assert_eq!(report.totals().saved, 1);
    assert_eq!(sink.inner.rows(JOBS_TABLE).len(), 1);
}

#[tokio::test]
async fn test_rejected_insert_counts_as_error() {
    let http = Arc::new(
        FakeHttp::new()
            .page("https://vagas.test/lista", VAGAS_LIST)
            .page("https://vagas.test/vaga/1", VAGAS_DETAIL),
    );
    let ctx = context(http, Arc::new(common::RejectingSink));

    let report = run_jobs(&ctx, &sources()[..1], no_pause()).await;

    let totals = report.totals();
    assert_eq!(totals.saved, 0);
    assert_eq!(totals.errors, 1);
    assert_eq!(totals.processed, 1);
}
