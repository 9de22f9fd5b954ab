use criterion::{Criterion, criterion_group, criterion_main};
use httpdtree_config::parse;
use std::hint::black_box;

fn generate_config(vhosts: usize) -> String {
    let mut source = String::new();
    for i in 0..vhosts {
        source.push_str("# generated virtual host\n");
        source.push_str("<VirtualHost *:80>\n");
        source.push_str(&format!("    ServerName host{}.example.com\n", i));
        source.push_str(&format!("    DocumentRoot \"/var/www/host{}\"\n", i));
        source.push_str(&format!("    <Directory \"/var/www/host{}\">\n", i));
        source.push_str("        Options Indexes FollowSymLinks\n");
        source.push_str("        Require all granted\n");
        source.push_str("    </Directory>\n");
        source.push_str("</VirtualHost>\n\n");
    }
    source
}

fn bench_parse(c: &mut Criterion) {
    let source = generate_config(500);
    c.bench_function("parse 500 vhosts", |b| {
        b.iter(|| parse(black_box(source.as_bytes())).unwrap())
    });
}

criterion_group!(benches, bench_parse);
criterion_main!(benches);
