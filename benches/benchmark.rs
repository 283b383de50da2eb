//! パフォーマンスベンチマーク
//!
//! sheetmdクレートの変換速度を測定するベンチマークです。
//! ワークブックはrust_xlsxwriterでメモリ上に生成するため、フィクスチャファイルは不要です。
//!
//! 実装するベンチマーク:
//! - 1シート・行数別の変換速度
//! - 複数シートの並列変換と逐次変換の比較
//! - レンダラー単体（ワークブックの読み込みを含まない）

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rust_xlsxwriter::{Workbook, XlsxError};
use sheetmd::{CellValue, ConverterBuilder, TableRenderer};
use std::io::Cursor;

const COLUMNS: u16 = 8;

/// 指定した行数・シート数のワークブックを生成する
fn generate_workbook(sheets: usize, rows: u32) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();

    for sheet_index in 0..sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(format!("Sheet{}", sheet_index + 1))?;

        for col in 0..COLUMNS {
            worksheet.write_string(0, col, format!("Header{}", col))?;
        }
        for row in 1..rows {
            for col in 0..COLUMNS {
                if col % 2 == 0 {
                    worksheet.write_string(row, col, format!("r{}c{}", row, col))?;
                } else {
                    worksheet.write_number(row, col, f64::from(row) * 0.5)?;
                }
            }
        }
    }

    workbook.save_to_buffer()
}

/// 1シートの行数別変換速度
fn benchmark_single_sheet(c: &mut Criterion) {
    let converter = ConverterBuilder::new().build().unwrap();

    let mut group = c.benchmark_group("single_sheet");
    group.sample_size(10);

    for rows in [100u32, 1_000, 10_000] {
        let data = generate_workbook(1, rows).unwrap();
        group.throughput(Throughput::Bytes(data.len() as u64));

        group.bench_with_input(BenchmarkId::from_parameter(rows), &data, |b, data| {
            b.iter(|| {
                let input = Cursor::new(black_box(data.as_slice()));
                let mut output = Vec::new();
                converter
                    .convert(black_box(input), black_box(&mut output))
                    .unwrap();
                black_box(output)
            });
        });
    }

    group.finish();
}

/// 複数シートの並列変換と逐次変換
fn benchmark_multi_sheet(c: &mut Criterion) {
    let data = generate_workbook(8, 2_000).unwrap();

    let parallel = ConverterBuilder::new().parallel(true).build().unwrap();
    let sequential = ConverterBuilder::new().parallel(false).build().unwrap();

    let mut group = c.benchmark_group("multi_sheet");
    group.throughput(Throughput::Bytes(data.len() as u64));
    group.sample_size(10);

    group.bench_function("parallel", |b| {
        b.iter(|| {
            parallel
                .convert_to_string(Cursor::new(black_box(data.as_slice())))
                .unwrap()
        });
    });

    group.bench_function("sequential", |b| {
        b.iter(|| {
            sequential
                .convert_to_string(Cursor::new(black_box(data.as_slice())))
                .unwrap()
        });
    });

    group.finish();
}

/// レンダラー単体（ワークブックの読み込みを含まない）
fn benchmark_renderer(c: &mut Criterion) {
    // 5行ごとに空白行、長さの異なる行を混ぜる
    let rows: Vec<Vec<CellValue>> = (0..10_000)
        .map(|row: i64| {
            if row % 5 == 4 {
                vec![CellValue::Empty; 4]
            } else {
                (0..(row % 6 + 1))
                    .map(|col| {
                        if col % 2 == 0 {
                            CellValue::from(format!("value|{}\n{}", row, col))
                        } else {
                            CellValue::Int(row * col)
                        }
                    })
                    .collect()
            }
        })
        .collect();

    let renderer = TableRenderer::new();

    c.bench_function("render_10000_rows", |b| {
        b.iter(|| renderer.render(black_box("Bench"), black_box(&rows)));
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .measurement_time(std::time::Duration::from_secs(10))
        .warm_up_time(std::time::Duration::from_secs(3));
    targets = benchmark_single_sheet, benchmark_multi_sheet, benchmark_renderer
}

criterion_main!(benches);
