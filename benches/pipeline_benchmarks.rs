//! Performance benchmarks for the meal voucher engine.
//!
//! Benchmarks `run_benefit` over synthetic rosters of increasing size,
//! with vacations, terminations and admissions spread across them.
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use meal_voucher_engine::calculation::run_benefit;
use meal_voucher_engine::config::BenefitConfig;
use meal_voucher_engine::models::{Competence, RawTable, SourceBundle, SourceKind};

const UNIONS: [&str; 4] = [
    "SINDPD SP - SIND.TRAB.EM PROC DADOS E EMPR.EMPRESAS PROC DADOS ESTADO DE SP.",
    "SINDPD RJ - SINDICATO PROFISSIONAIS DE PROC DADOS DO RIO DE JANEIRO",
    "SINDPPD RS - SINDICATO DOS TRAB. EM PROC. DE DADOS RIO GRANDE DO SUL",
    "SITEPD PR - SIND DOS TRAB EM EMPR PRIVADAS DE PROC DE DADOS DE CURITIBA E REGIAO METROPOLITANA",
];

/// Builds a complete source bundle with `employees` roster rows.
fn create_sources(employees: usize) -> SourceBundle {
    let mut roster = RawTable::new(["MATRICULA", "TITULO DO CARGO", "Sindicato"]);
    let mut vacations = RawTable::new(["MATRICULA", "DIAS DE FÉRIAS"]);
    let mut terminations =
        RawTable::new(["MATRICULA", "DATA DEMISSÃO", "COMUNICADO DE DESLIGAMENTO"]);
    let mut admissions = RawTable::new(["MATRICULA", "Admissão"]);
    let mut interns = RawTable::new(["MATRICULA"]);

    for i in 0..employees {
        let id = (30000 + i).to_string();
        let title = if i % 50 == 0 { "DIRETOR" } else { "ANALISTA" };
        roster = roster.with_row([id.as_str(), title, UNIONS[i % UNIONS.len()]]);

        match i % 10 {
            1 => vacations = vacations.with_row([id.clone(), (i % 20).to_string()]),
            2 => {
                terminations = terminations.with_row([
                    id.clone(),
                    format!("2025-05-{:02}", 1 + i % 28),
                    if i % 3 == 0 { "OK" } else { "" }.to_string(),
                ])
            }
            3 => admissions = admissions.with_row([id.clone(), format!("{:02}/05/2025", 1 + i % 28)]),
            4 if i % 40 == 4 => interns = interns.with_row([id.clone()]),
            _ => {}
        }
    }

    SourceKind::ALL
        .into_iter()
        .fold(SourceBundle::new(), |bundle, kind| {
            bundle.with(kind, RawTable::new(["MATRICULA"]))
        })
        .with(SourceKind::ActiveEmployees, roster)
        .with(SourceKind::Vacations, vacations)
        .with(SourceKind::Terminations, terminations)
        .with(SourceKind::Admissions, admissions)
        .with(SourceKind::Interns, interns)
        .with(
            SourceKind::UnionWorkdays,
            RawTable::new(["SINDICATO", "DIAS UTEIS"])
                .with_row(["SINDPD SP", "22"])
                .with_row(["SINDPD RJ", "21"])
                .with_row(["SINDPPD RS", "21"])
                .with_row(["SITEPD PR", "22"]),
        )
        .with(
            SourceKind::UnionRates,
            RawTable::new(["ESTADO", "VALOR"])
                .with_row(["Paraná", "35,00"])
                .with_row(["Rio de Janeiro", "35,00"])
                .with_row(["Rio Grande do Sul", "35,00"])
                .with_row(["São Paulo", "37,50"]),
        )
}

/// Benchmark: a single-employee run.
fn bench_single_employee(c: &mut Criterion) {
    let config = BenefitConfig::default();
    let competence = Competence::new(2025, 5).unwrap();
    let sources = create_sources(1);

    c.bench_function("single_employee", |b| {
        b.iter(|| black_box(run_benefit(black_box(&sources), competence, &config).unwrap()))
    });
}

/// Benchmark: roster sizes to understand scaling behavior.
fn bench_scaling(c: &mut Criterion) {
    let config = BenefitConfig::default();
    let competence = Competence::new(2025, 5).unwrap();

    let mut group = c.benchmark_group("scaling");
    group.sample_size(20);

    for employees in [100, 1000, 5000] {
        let sources = create_sources(employees);

        group.throughput(Throughput::Elements(employees as u64));
        group.bench_with_input(BenchmarkId::new("employees", employees), &sources, |b, sources| {
            b.iter(|| black_box(run_benefit(sources, competence, &config).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_single_employee, bench_scaling);
criterion_main!(benches);
