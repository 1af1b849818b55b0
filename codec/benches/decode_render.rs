//! Datagram decode and text render benchmarks.
//!
//! Run with: cargo bench -p msgscope-codec --bench decode_render

use codec::{
    decode_message, parse_datagram_text, render_message, CodecLimits, Direction, RenderOptions,
    StaticSession,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use demo_catalog::demo_catalog;
use template::TemplateCatalog;
use uuid::Uuid;

fn session() -> StaticSession {
    StaticSession {
        session_id: Some(Uuid::from_u128(1)),
        agent_id: Some(Uuid::from_u128(2)),
        ..StaticSession::default()
    }
}

/// Builds an `ObjectLink` datagram with `links` object ids.
fn object_link(catalog: &TemplateCatalog, links: usize) -> Vec<u8> {
    let mut text = String::from(
        "out ObjectLink\n[AgentData]\nAgentID = $AgentId\nSessionID = $SessionId\n",
    );
    for id in 0..links {
        text.push_str(&format!("[ObjectData]\nObjectLocalID = {}\n", 1000 + id));
    }
    let limits = CodecLimits::default();
    parse_datagram_text(catalog, &session(), &text, &limits)
        .and_then(|parsed| parsed.to_datagram(&limits).map_err(Into::into))
        .unwrap_or_default()
}

fn bench_decode(c: &mut Criterion) {
    let catalog = demo_catalog().unwrap_or_else(|err| panic!("demo catalog: {err}"));
    let limits = CodecLimits::default();
    let mut group = c.benchmark_group("decode");
    for links in [1usize, 16, 200] {
        let bytes = object_link(&catalog, links);
        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(BenchmarkId::new("object_link", links), &bytes, |b, bytes| {
            b.iter(|| decode_message(&catalog, black_box(bytes), &limits));
        });
    }
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let catalog = demo_catalog().unwrap_or_else(|err| panic!("demo catalog: {err}"));
    let limits = CodecLimits::default();
    let options = RenderOptions::default();
    let mut group = c.benchmark_group("render");
    for links in [1usize, 16, 200] {
        let bytes = object_link(&catalog, links);
        let Ok(message) = decode_message(&catalog, &bytes, &limits) else {
            continue;
        };
        group.bench_with_input(BenchmarkId::new("object_link", links), &message, |b, message| {
            b.iter(|| render_message(black_box(message), Direction::Outgoing, &options));
        });
    }
    group.finish();
}

fn bench_parse(c: &mut Criterion) {
    let catalog = demo_catalog().unwrap_or_else(|err| panic!("demo catalog: {err}"));
    let limits = CodecLimits::default();
    let session = session();
    let bytes = object_link(&catalog, 200);
    let Ok(message) = decode_message(&catalog, &bytes, &limits) else {
        return;
    };
    let text = render_message(&message, Direction::Outgoing, &RenderOptions::default());
    c.bench_function("parse/object_link/200", |b| {
        b.iter(|| parse_datagram_text(&catalog, &session, black_box(&text), &limits));
    });
}

criterion_group!(benches, bench_decode, bench_render, bench_parse);
criterion_main!(benches);
