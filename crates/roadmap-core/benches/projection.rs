use chrono::{Days, NaiveDate};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use roadmap_core::axis::month_ticks;
use roadmap_core::filter::{SpacingBounds, ViewState};
use roadmap_core::layout::project;
use roadmap_core::model::{RoadmapRecord, Status};
use roadmap_core::store::RecordStore;
use roadmap_core::view::TimelineView;
use roadmap_core::window::VisibleWindow;

const TIERS: [usize; 3] = [10, 1_000, 10_000];

fn base() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default()
}

fn synthetic_records(count: usize) -> Vec<RoadmapRecord> {
    let statuses = Status::ALL;
    (0..count)
        .map(|i| {
            let start = base() + Days::new((i * 7 % 700) as u64);
            RoadmapRecord {
                id: i.to_string(),
                name: format!("Initiative {i}"),
                start_date: start,
                end_date: start + Days::new((i % 90 + 1) as u64),
                status: statuses[i % statuses.len()],
                owner: format!("Team {}", i % 25),
                details: format!("/markdown/{i}.md"),
            }
        })
        .collect()
}

fn bench_project(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout.project");
    let window = VisibleWindow::new(base(), base() + Days::new(365));

    for count in TIERS {
        let records = synthetic_records(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &records, |b, records| {
            b.iter(|| black_box(project(black_box(records), window).len()));
        });
    }

    group.finish();
}

fn bench_snapshot(c: &mut Criterion) {
    let mut group = c.benchmark_group("view.snapshot");

    for count in TIERS {
        let state = ViewState::new(
            RecordStore::new(synthetic_records(count)),
            SpacingBounds::default(),
            base(),
        );
        let view = TimelineView::new(state);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &view, |b, view| {
            b.iter(|| black_box(view.snapshot().shown));
        });
    }

    group.finish();
}

fn bench_ticks(c: &mut Criterion) {
    let window = VisibleWindow::new(base(), base() + Days::new(3 * 365));
    c.bench_function("axis.month_ticks", |b| {
        b.iter(|| black_box(month_ticks(black_box(window)).count()));
    });
}

criterion_group!(benches, bench_project, bench_snapshot, bench_ticks);
criterion_main!(benches);
