use criterion::{black_box, criterion_group, criterion_main, Criterion};

use carbonize::emit::Emitter;
use carbonize::lexer::lex;
use carbonize::lowering::lower_function;
use carbonize::parser::parse;
use carbonize::pipeline::Translator;
use carbonize::typechecker::check_function;

const SAMPLE: &str = r#"
int sum_to(int n) {
    int sum = 0;
    for (int i = 0; i < n; i++) {
        sum += i;
    }
    return sum;
}

bool in_range(int x, int lo, int hi) {
    return x >= lo && x <= hi;
}

int classify(int x) {
    int ret = 0;
    if (x < 0) {
        ret = -1;
    } else if (x > 100) {
        ret = 2;
    } else {
        ret = 1;
    }
    return ret;
}
"#;

fn translation_benchmark(c: &mut Criterion) {
    let translator = Translator::default();
    c.bench_function("translate_source", |b| {
        b.iter(|| translator.translate_source(black_box(SAMPLE)))
    });

    let unit = parse(lex(SAMPLE).expect("sample lexes")).expect("sample parses");
    let functions = unit
        .functions()
        .map(|node| lower_function(node).expect("sample lowers"))
        .collect::<Vec<_>>();
    let emitter = Emitter::carbon();

    c.bench_function("check_and_emit", |b| {
        b.iter(|| {
            for function in &functions {
                check_function(black_box(function)).expect("sample checks");
                emitter.emit_function(function).expect("sample emits");
            }
        })
    });
}

criterion_group!(benches, translation_benchmark);
criterion_main!(benches);
