use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use radial_label_renderer::config::{Config, LayoutConfig};
use radial_label_renderer::error::ImageLoadError;
use radial_label_renderer::hero::DecodedImage;
use radial_label_renderer::layout::{plan_label, wrap_lines};
use radial_label_renderer::render::render_svg;
use radial_label_renderer::surface::{Context2d, RecordingHost};
use radial_label_renderer::text_metrics::measure_text_width;
use std::hint::black_box;

const CAPTIONS: [&str; 4] = [
    "Short",
    "A caption that needs a couple of lines",
    "图片描述文本内容很长需要换行",
    "supercalifragilisticexpialidocious-and-then-some",
];

fn stub_image(_: &str) -> Result<DecodedImage, ImageLoadError> {
    Ok(DecodedImage {
        width: 160,
        height: 160,
        href: String::new(),
    })
}

fn labels(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| format!("{} #{i}", CAPTIONS[i % CAPTIONS.len()]))
        .collect()
}

fn bench_wrap(c: &mut Criterion) {
    let mut group = c.benchmark_group("wrap");
    for caption in CAPTIONS {
        group.bench_with_input(
            BenchmarkId::from_parameter(caption.chars().count()),
            caption,
            |b, text| {
                b.iter(|| {
                    let lines = wrap_lines(black_box(text), 80.0, |line| {
                        measure_text_width(line, 14.0, "sans-serif")
                    });
                    black_box(lines.len());
                });
            },
        );
    }
    group.finish();
}

fn bench_plan(c: &mut Criterion) {
    let mut group = c.benchmark_group("plan_label");
    for angle in [45.0f32, 90.0, 200.0, 360.0] {
        group.bench_with_input(BenchmarkId::from_parameter(angle), &angle, |b, &angle| {
            b.iter(|| {
                let placement = plan_label(80.0, black_box(angle), CAPTIONS[1], |line| {
                    line.chars().count() as f32 * 7.0
                });
                black_box(placement.lines.len());
            });
        });
    }
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    for count in [0usize, 4, 12, 48] {
        let layout = LayoutConfig {
            description: labels(count),
            ..LayoutConfig::default()
        };
        group.bench_with_input(BenchmarkId::new("recording", count), &layout, |b, layout| {
            b.iter(|| {
                let mut host = RecordingHost::new().with_container("img-box", 500.0, 500.0);
                let outcome = radial_label_renderer::render(&mut host, &stub_image, layout)
                    .expect("render failed");
                black_box(outcome.context.commands().len());
            });
        });

        let config = Config {
            layout: layout.clone(),
            ..Config::default()
        };
        group.bench_with_input(BenchmarkId::new("svg", count), &config, |b, config| {
            b.iter(|| {
                let outcome = render_svg(black_box(config), &stub_image).expect("render failed");
                black_box(outcome.context.to_svg().len());
            });
        });
    }
    group.finish();
}

fn bench_measure(c: &mut Criterion) {
    let mut host = RecordingHost::new().with_container("img-box", 500.0, 500.0);
    let outcome = radial_label_renderer::render(&mut host, &stub_image, &LayoutConfig::default())
        .expect("render failed");
    let mut ctx = outcome.context;
    c.bench_function("measure_recording", |b| {
        b.iter(|| black_box(ctx.measure_text(black_box(CAPTIONS[1]))));
    });
    c.bench_function("measure_font", |b| {
        b.iter(|| black_box(measure_text_width(black_box(CAPTIONS[1]), 14.0, "sans-serif")));
    });
}

criterion_group!(benches, bench_wrap, bench_plan, bench_render, bench_measure);
criterion_main!(benches);
