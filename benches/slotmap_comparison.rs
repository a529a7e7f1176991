use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use resource_table::{ResourceHandle, ResourceTable, Unchecked};
use slotmap::SlotMap;
use std::hint::black_box;

const KIND: u16 = 1;

// ========== 基础操作测试 ==========

/// 测试插入操作性能
fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");

    for size in [100, 1000, 10000].iter() {
        group.bench_with_input(BenchmarkId::new("ResourceTable", size), size, |b, &size| {
            b.iter(|| {
                let mut table = ResourceTable::new(KIND, 0);
                for i in 0..size {
                    table.insert(black_box(i));
                }
                table
            });
        });

        group.bench_with_input(BenchmarkId::new("SlotMap", size), size, |b, &size| {
            b.iter(|| {
                let mut map = SlotMap::new();
                for i in 0..size {
                    map.insert(black_box(i));
                }
                map
            });
        });
    }

    group.finish();
}

/// 测试预分配 + 插入操作性能
fn bench_preallocated_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("preallocated_insert");

    for size in [100, 1000, 10000].iter() {
        group.bench_with_input(BenchmarkId::new("ResourceTable", size), size, |b, &size| {
            b.iter(|| {
                let mut table = ResourceTable::new(KIND, size);
                for i in 0..size {
                    table.insert(black_box(i));
                }
                table
            });
        });

        group.bench_with_input(BenchmarkId::new("SlotMap", size), size, |b, &size| {
            b.iter(|| {
                let mut map = SlotMap::with_capacity(size);
                for i in 0..size {
                    map.insert(black_box(i));
                }
                map
            });
        });
    }

    group.finish();
}

/// 测试查询操作性能
fn bench_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("get");

    for size in [100, 1000, 10000].iter() {
        // 准备 ResourceTable
        let mut table = ResourceTable::new(KIND, *size);
        let handles: Vec<_> = (0..*size).map(|i| table.insert(i)).collect();

        group.bench_with_input(BenchmarkId::new("ResourceTable", size), size, |b, _| {
            b.iter(|| {
                for &handle in &handles {
                    black_box(table.get(handle));
                }
            });
        });

        // 先 contains 再 item_at（不再重复校验）
        let mut unchecked = ResourceTable::<usize, Unchecked>::with_policy(KIND, *size);
        let unchecked_handles: Vec<_> = (0..*size).map(|i| unchecked.insert(i)).collect();

        group.bench_with_input(
            BenchmarkId::new("ResourceTable_unchecked", size),
            size,
            |b, _| {
                b.iter(|| {
                    for &handle in &unchecked_handles {
                        if unchecked.contains(handle) {
                            black_box(unchecked.item_at(handle));
                        }
                    }
                });
            },
        );

        // 准备 SlotMap
        let mut slot_map = SlotMap::new();
        let slot_keys: Vec<_> = (0..*size).map(|i| slot_map.insert(i)).collect();

        group.bench_with_input(BenchmarkId::new("SlotMap", size), size, |b, _| {
            b.iter(|| {
                for &key in &slot_keys {
                    black_box(slot_map.get(key));
                }
            });
        });
    }

    group.finish();
}

/// 测试删除操作性能
fn bench_erase(c: &mut Criterion) {
    let mut group = c.benchmark_group("erase");

    for size in [100, 1000, 10000].iter() {
        group.bench_with_input(BenchmarkId::new("ResourceTable", size), size, |b, &size| {
            b.iter_batched(
                || {
                    let mut table = ResourceTable::new(KIND, size);
                    let handles: Vec<_> = (0..size).map(|i| table.insert(i)).collect();
                    (table, handles)
                },
                |(mut table, handles)| {
                    for handle in handles {
                        black_box(table.erase(handle));
                    }
                    table
                },
                criterion::BatchSize::SmallInput,
            );
        });

        group.bench_with_input(BenchmarkId::new("SlotMap", size), size, |b, &size| {
            b.iter_batched(
                || {
                    let mut map = SlotMap::new();
                    let keys: Vec<_> = (0..size).map(|i| map.insert(i)).collect();
                    (map, keys)
                },
                |(mut map, keys)| {
                    for key in keys {
                        black_box(map.remove(key));
                    }
                    map
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

/// 测试迭代操作性能
fn bench_iter(c: &mut Criterion) {
    let mut group = c.benchmark_group("iter");

    for size in [100, 1000, 10000].iter() {
        // 准备 ResourceTable，删掉一半制造空洞
        let mut table = ResourceTable::new(KIND, *size);
        let handles: Vec<_> = (0..*size).map(|i| table.insert(i)).collect();
        for handle in handles.iter().step_by(2) {
            table.erase(*handle);
        }

        group.bench_with_input(BenchmarkId::new("ResourceTable", size), size, |b, _| {
            b.iter(|| {
                for (handle, value) in table.iter() {
                    black_box(handle);
                    black_box(value);
                }
            });
        });

        group.bench_with_input(
            BenchmarkId::new("ResourceTable_slice", size),
            size,
            |b, _| {
                b.iter(|| {
                    for value in table.as_slice() {
                        black_box(value);
                    }
                });
            },
        );

        // 准备 SlotMap
        let mut slot_map = SlotMap::new();
        let keys: Vec<_> = (0..*size).map(|i| slot_map.insert(i)).collect();
        for key in keys.iter().step_by(2) {
            slot_map.remove(*key);
        }

        group.bench_with_input(BenchmarkId::new("SlotMap", size), size, |b, _| {
            b.iter(|| {
                for (key, value) in &slot_map {
                    black_box(key);
                    black_box(value);
                }
            });
        });
    }

    group.finish();
}

// ========== 真实场景测试 ==========

/// 测试混合操作（插入、查询、删除）
fn bench_mixed_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("mixed_operations");

    for size in [100, 1000, 10000].iter() {
        group.bench_with_input(BenchmarkId::new("ResourceTable", size), size, |b, &size| {
            b.iter(|| {
                let mut table = ResourceTable::new(KIND, 0);

                // 插入
                let handles: Vec<_> = (0..size).map(|i| table.insert(black_box(i))).collect();

                // 查询
                for &handle in &handles {
                    black_box(table.get(handle));
                }

                // 删除一半
                for i in (0..size).step_by(2) {
                    table.erase(handles[i]);
                }

                // 再插入一半
                for i in 0..size / 2 {
                    table.insert(black_box(i + size));
                }

                table
            });
        });

        group.bench_with_input(BenchmarkId::new("SlotMap", size), size, |b, &size| {
            b.iter(|| {
                let mut map = SlotMap::new();

                // 插入
                let keys: Vec<_> = (0..size).map(|i| map.insert(black_box(i))).collect();

                // 查询
                for &key in &keys {
                    black_box(map.get(key));
                }

                // 删除一半
                for i in (0..size).step_by(2) {
                    map.remove(keys[i]);
                }

                // 再插入一半
                for i in 0..size / 2 {
                    map.insert(black_box(i + size));
                }

                map
            });
        });
    }

    group.finish();
}

/// 测试高频插入删除（模拟对象池场景）
fn bench_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("churn");

    for size in [100, 1000, 10000].iter() {
        group.bench_with_input(BenchmarkId::new("ResourceTable", size), size, |b, &size| {
            b.iter(|| {
                let mut table = ResourceTable::new(KIND, 0);

                // 预热：填充一半容量
                let mut handles: Vec<_> = (0..size / 2).map(|i| table.insert(black_box(i))).collect();

                // 高频插入删除
                for i in 0..size {
                    // 删除一个
                    if i < handles.len() {
                        table.erase(handles[i]);
                    }

                    // 插入一个
                    let handle = table.insert(black_box(i));
                    if i < handles.len() {
                        handles[i] = handle;
                    }
                }

                table
            });
        });

        group.bench_with_input(BenchmarkId::new("SlotMap", size), size, |b, &size| {
            b.iter(|| {
                let mut map = SlotMap::new();

                // 预热：填充一半容量
                let mut keys: Vec<_> = (0..size / 2).map(|i| map.insert(black_box(i))).collect();

                // 高频插入删除
                for i in 0..size {
                    // 删除一个
                    if i < keys.len() {
                        map.remove(keys[i]);
                    }

                    // 插入一个
                    let key = map.insert(black_box(i));
                    if i < keys.len() {
                        keys[i] = key;
                    }
                }

                map
            });
        });
    }

    group.finish();
}

/// 测试值内保存自身 handle 的场景（emplace_with 对比先插入再回填）
fn bench_self_referencing_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("self_referencing_insert");

    for size in [100, 1000, 10000].iter() {
        group.bench_with_input(
            BenchmarkId::new("ResourceTable_emplace_with", size),
            size,
            |b, &size| {
                b.iter(|| {
                    let mut table = ResourceTable::new(KIND, 0);
                    for i in 0..size {
                        table.emplace_with(|own| (own, black_box(i)));
                    }
                    table
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("ResourceTable_backfill", size),
            size,
            |b, &size| {
                b.iter(|| {
                    let mut table = ResourceTable::new(KIND, 0);
                    for i in 0..size {
                        let handle = table.insert((ResourceHandle::invalid(), black_box(i)));
                        table[handle].0 = handle;
                    }
                    table
                });
            },
        );

        group.bench_with_input(BenchmarkId::new("SlotMap_with_key", size), size, |b, &size| {
            b.iter(|| {
                let mut map = SlotMap::new();
                for i in 0..size {
                    map.insert_with_key(|own| (own, black_box(i)));
                }
                map
            });
        });
    }

    group.finish();
}

/// 测试碎片整理（打乱后按值排序）
fn bench_defragment(c: &mut Criterion) {
    let mut group = c.benchmark_group("defragment");

    for size in [100, 1000, 10000].iter() {
        group.bench_with_input(BenchmarkId::new("ResourceTable", size), size, |b, &size| {
            b.iter_batched(
                || {
                    let mut table = ResourceTable::new(KIND, size);
                    let handles: Vec<_> = (0..size).map(|i| table.insert(i)).collect();
                    // 删除再回填，打乱存储顺序
                    for handle in handles.iter().step_by(3) {
                        table.erase(*handle);
                    }
                    for i in 0..size / 3 {
                        table.insert(size - i);
                    }
                    table
                },
                |mut table| {
                    black_box(table.defragment(|a, b| a < b));
                    table
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

/// 测试内存占用（通过克隆操作来间接测试）
fn bench_clone(c: &mut Criterion) {
    let mut group = c.benchmark_group("clone");

    for size in [100, 1000, 10000].iter() {
        // 准备 ResourceTable
        let mut table = ResourceTable::new(KIND, *size);
        for i in 0..*size {
            table.insert(i);
        }

        group.bench_with_input(BenchmarkId::new("ResourceTable", size), size, |b, _| {
            b.iter(|| black_box(table.clone()));
        });

        // 准备 SlotMap
        let mut slot_map = SlotMap::new();
        for i in 0..*size {
            slot_map.insert(i);
        }

        group.bench_with_input(BenchmarkId::new("SlotMap", size), size, |b, _| {
            b.iter(|| black_box(slot_map.clone()));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_insert,
    bench_preallocated_insert,
    bench_get,
    bench_erase,
    bench_iter,
    bench_mixed_operations,
    bench_churn,
    bench_self_referencing_insert,
    bench_defragment,
    bench_clone,
);

criterion_main!(benches);
