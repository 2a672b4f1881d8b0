//! Benchmarks for the hot manifest-rewrite path.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use recaster::hls::rewriter::rewrite_playlist;

fn media_playlist(segments: usize) -> String {
    let mut out = String::from("#EXTM3U\n#EXT-X-VERSION:3\n#EXT-X-TARGETDURATION:6\n");
    for i in 0..segments {
        out.push_str("#EXTINF:6.0,\n");
        out.push_str(&format!("{i}.ts?api_key=abcdef\n"));
    }
    out.push_str("#EXT-X-ENDLIST\n");
    out
}

fn bench_rewrite(c: &mut Criterion) {
    let small = media_playlist(10);
    let large = media_playlist(1000);

    c.bench_function("rewrite_media_playlist_10_segments", |b| {
        b.iter(|| rewrite_playlist(black_box(&small), "movie1", "sess1"))
    });

    c.bench_function("rewrite_media_playlist_1000_segments", |b| {
        b.iter(|| rewrite_playlist(black_box(&large), "movie1", "sess1"))
    });
}

criterion_group!(benches, bench_rewrite);
criterion_main!(benches);
