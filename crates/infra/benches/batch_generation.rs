use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};

use std::sync::Arc;

use chrono::NaiveDate;

use rebill_clients::{BillingFrequency, BillingLedger, Client, ClientStatus, FeeSchedule};
use rebill_core::{BillingMonth, ClientId};
use rebill_engine::batch::BatchGenerator;
use rebill_engine::compute::compute_charge;
use rebill_infra::{InMemoryClientRepository, InMemoryInvoiceRepository, StaticSettingsProvider};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn month(y: i32, m: u32) -> BillingMonth {
    BillingMonth::new(y, m).unwrap()
}

/// Mixed roster entry: mostly monthly clients, some yearly, some with a
/// pending production cost or a carried balance.
fn roster_client(i: usize) -> Client {
    let mut client = Client {
        id: ClientId::new(),
        name: format!("client {i:04}"),
        status: ClientStatus::Active,
        billing: if i % 7 == 0 {
            BillingFrequency::Yearly
        } else {
            BillingFrequency::Monthly
        },
        site_published_on: Some(date(2024, 1, 10)),
        contract_ends_on: None,
        initial_production_cost: if i % 5 == 0 { Some(80_000) } else { None },
        fees: FeeSchedule::fixed(date(2024, 1, 1), 10_000 + (i as i64 % 9) * 1_000),
        ledger: BillingLedger::new(),
    };
    if i % 3 == 0 {
        client
            .ledger
            .apply_payment_difference((i as i64 % 11 - 5) * 500)
            .unwrap();
    }
    client
}

fn seeded_generator(
    size: usize,
) -> BatchGenerator<
    Arc<InMemoryClientRepository>,
    Arc<InMemoryInvoiceRepository>,
    StaticSettingsProvider,
> {
    let clients = InMemoryClientRepository::arc();
    for i in 0..size {
        clients.insert(roster_client(i));
    }
    let invoices = InMemoryInvoiceRepository::arc();
    BatchGenerator::new(clients, invoices, StaticSettingsProvider::default())
}

fn bench_charge_computation(c: &mut Criterion) {
    let mut group = c.benchmark_group("charge_computation");
    group.sample_size(1000);

    group.bench_function("monthly_with_adjustments", |b| {
        let mut client = roster_client(1);
        client.initial_production_cost = Some(80_000);
        client.ledger.apply_payment_difference(5_000).unwrap();
        let target = month(2025, 3);

        b.iter(|| compute_charge(black_box(&client), target).unwrap());
    });

    group.bench_function("monthly_prorated_over_six_months", |b| {
        let mut client = roster_client(1);
        client
            .ledger
            .advance_last_paid_period(month(2024, 8));
        let target = month(2025, 3);

        b.iter(|| compute_charge(black_box(&client), target).unwrap());
    });

    group.finish();
}

fn bench_preview(c: &mut Criterion) {
    let mut group = c.benchmark_group("preview_run");

    for size in [10, 100, 1000].iter() {
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("roster", size), size, |b, &size| {
            let generator = seeded_generator(size);
            let target = month(2025, 3);

            b.iter(|| black_box(generator.preview(target, None).unwrap()));
        });
    }

    group.finish();
}

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_run");

    for size in [10, 100, 1000].iter() {
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("roster", size), size, |b, &size| {
            let target = month(2025, 3);

            // Generate persists, so every iteration needs fresh stores.
            b.iter_batched(
                || seeded_generator(size),
                |generator| black_box(generator.generate(target, None, None).unwrap()),
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_charge_computation,
    bench_preview,
    bench_generate
);
criterion_main!(benches);
