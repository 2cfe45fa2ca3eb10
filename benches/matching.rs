use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use routepat::{
    parse, substitute_required_values, NoPolicies, RequiredValue, RequiredValues,
    RoutePatternMatcher,
};

const TEMPLATES: [&str; 5] = [
    "{controller=Home}/{action=Index}/{id?}",
    "api/v1/users/{id:int}/posts/{post}",
    "files/{**path}",
    "{year}-{month}-{day}/{slug}.{format?}",
    "zoo/{category}/animals/{id}/habitats/{habitat_id}/sections/{section_id}",
];

fn bench_parse(c: &mut Criterion) {
    c.bench_function("template_parse", |b| {
        b.iter(|| {
            for template in TEMPLATES {
                black_box(parse(black_box(template)).ok());
            }
        })
    });
}

fn bench_match(c: &mut Criterion) {
    let matchers: Vec<RoutePatternMatcher> = TEMPLATES
        .iter()
        .filter_map(|t| parse(t).ok())
        .map(|p| RoutePatternMatcher::new(&p, p.defaults().clone()))
        .collect();
    let paths = [
        "/",
        "/Store/Edit/17",
        "/api/v1/users/42/posts/hello",
        "/files/css/site/main.css",
        "/2024-01-31/release-notes.html",
        "/zoo/cats/animals/123/habitats/88/sections/5",
    ];
    c.bench_function("route_match", |b| {
        b.iter(|| {
            for matcher in &matchers {
                for path in paths {
                    black_box(matcher.try_match(black_box(path)));
                }
            }
        })
    });
}

fn bench_substitute(c: &mut Criterion) {
    let pattern =
        parse("{area}/{controller=Home}/{action=Index}/{id?}").expect("failed to parse template");
    let mut required = RequiredValues::new();
    required.insert("area", RequiredValue::value("Admin"));
    required.insert("controller", RequiredValue::value("Store"));
    required.insert("action", RequiredValue::Any);
    c.bench_function("required_value_substitution", |b| {
        b.iter(|| black_box(substitute_required_values(&pattern, &required, &NoPolicies)))
    });
}

criterion_group!(benches, bench_parse, bench_match, bench_substitute);
criterion_main!(benches);
