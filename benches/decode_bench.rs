use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pwtimelapse::header::{FrameHeader, SaveHeader};
use pwtimelapse::lz4::decompress_block_to_vec;
use pwtimelapse::{load_timelapse_with, LoadOptions, RawFileEntry};

fn jpeg_like(seed: u8, len: usize) -> Vec<u8> {
    (0..len).map(|i| ((i / 7) as u8).wrapping_mul(seed) ^ (i % 13) as u8).collect()
}

fn bench_block(c: &mut Criterion) {
    let data = jpeg_like(31, 1024 * 1024);
    let block = lz4_flex::block::compress(&data);
    let rle = lz4_flex::block::compress(&vec![7u8; 1024 * 1024]);

    c.bench_function("lz4_block_decode_1mb", |b| {
        b.iter(|| decompress_block_to_vec(black_box(&block), 0, data.len()).unwrap())
    });
    c.bench_function("lz4_block_decode_1mb_rle", |b| {
        b.iter(|| decompress_block_to_vec(black_box(&rle), 0, 1024 * 1024).unwrap())
    });
}

fn bench_complete_save(c: &mut Criterion) {
    let mut payload = Vec::new();
    for i in 0..60u8 {
        let jpeg = jpeg_like(i | 1, 64 * 1024);
        let block = lz4_flex::block::compress(&jpeg);
        FrameHeader::new(0, 0, jpeg.len() as u32, block.len() as u32).write(&mut payload).unwrap();
        payload.extend_from_slice(&block);
    }
    let packed = zstd::encode_all(&payload[..], 3).unwrap();
    let mut data = Vec::new();
    SaveHeader { checksum: 0, width: 1920, height: 1080, uncompressed_size: payload.len() as i64, compressed_size: packed.len() as i64 }
        .write(&mut data)
        .unwrap();
    data.extend_from_slice(&packed);
    let files = vec![RawFileEntry::new("BENCH_MAP_TIMELAPSE-COMP_0-100.sav", data)];

    for parallel in [false, true] {
        let opts = LoadOptions { parallel, verify_duplicate: false };
        let name = if parallel { "load_complete_60_frames_parallel" } else { "load_complete_60_frames" };
        c.bench_function(name, |b| {
            b.iter(|| load_timelapse_with(black_box(&files), "BENCH_MAP_TIMELAPSE-COMP", &opts, None).unwrap())
        });
    }
}

criterion_group!(benches, bench_block, bench_complete_save);
criterion_main!(benches);
