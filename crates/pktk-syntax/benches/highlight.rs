use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use pktk_syntax::{Highlighter, LanguageDefinition, RuleDefinition, TokenType};
use std::sync::Arc;

fn language() -> Arc<LanguageDefinition> {
    let language = LanguageDefinition::builder("bench")
        .rule(RuleDefinition::new(TokenType::Comment, r"/\*.*?\*/").multi_line(r"/\*", r"\*/"))
        .rule(RuleDefinition::new(TokenType::Comment, r"//.*$"))
        .rule(RuleDefinition::new(TokenType::String, r#""[^"]*""#))
        .rule(RuleDefinition::new(TokenType::Keyword, r"\b(?:fn|let|mut|return|if|else)\b"))
        .rule(RuleDefinition::new(TokenType::Number, r"\b\d+\b"))
        .rule(RuleDefinition::new(TokenType::Identifier, r"[A-Za-z_]\w*"))
        .rule(RuleDefinition::new(TokenType::Operator, r"[=+\-*/<>!]"))
        .rule(RuleDefinition::new(TokenType::Delimiter, r"[;,(){}]"))
        .rule(RuleDefinition::new(TokenType::Space, r"\s+"))
        .build()
        .unwrap();
    Arc::new(language)
}

fn large_text(line_count: usize) -> Vec<String> {
    (0..line_count)
        .map(|i| match i % 10 {
            0 => "/* block comment".to_string(),
            1 => "   spanning lines */ let x = 1;".to_string(),
            _ => format!("let value_{i} = compute({i}, \"text\") + {i}; // note"),
        })
        .collect()
}

fn bench_full_highlight(c: &mut Criterion) {
    let language = language();
    let lines = large_text(10_000);
    c.bench_function("full_highlight/10k_lines", |b| {
        b.iter_batched(
            || lines.clone(),
            |lines| {
                let mut highlighter = Highlighter::new(language.clone());
                highlighter.set_lines(lines);
                black_box(highlighter.line_count());
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_typing_in_middle(c: &mut Criterion) {
    let language = language();
    let lines = large_text(10_000);
    c.bench_function("typing_middle/100_edits", |b| {
        b.iter_batched(
            || {
                let mut highlighter = Highlighter::new(language.clone());
                highlighter.set_lines(lines.clone());
                highlighter
            },
            |mut highlighter| {
                let line = 5_002;
                let mut text = highlighter.line_text(line).unwrap_or_default().to_string();
                for _ in 0..100 {
                    text.push('x');
                    black_box(highlighter.text_changed(line, &text));
                }
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_open_comment_cascade(c: &mut Criterion) {
    let language = language();
    let lines = large_text(10_000);
    c.bench_function("cascade/open_and_close_comment", |b| {
        b.iter_batched(
            || {
                let mut highlighter = Highlighter::new(language.clone());
                highlighter.set_lines(lines.clone());
                highlighter
            },
            |mut highlighter| {
                black_box(highlighter.text_changed(5_005, "/* unterminated"));
                black_box(highlighter.text_changed(5_005, "let closed = 0;"));
            },
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(
    benches,
    bench_full_highlight,
    bench_typing_in_middle,
    bench_open_comment_cascade
);
criterion_main!(benches);
