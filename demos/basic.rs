use resource_table::{ResourceHandle, ResourceTable};

const NAMES: u16 = 1;

fn main() {
    // 1. Create a table for one resource type with room for 3 values
    // 1. 为一种资源类型创建一个可容纳 3 个值的表
    let mut table: ResourceTable<String> = ResourceTable::new(NAMES, 3);

    // 2. Insert values, each insert returns a handle
    // 2. 插入值，每次插入返回一个 handle
    println!("Inserting values...");
    let alice = table.emplace("Alice");
    let bob = table.emplace("Bob");
    let charlie = table.insert(String::from("Charlie"));

    // 3. Access values using handles
    // 3. 使用 handle 访问值
    println!("\nAccessing values:");
    println!("{alice}: {:?}", table.get(alice));
    println!("{bob}: {:?}", table.get(bob));
    println!("{charlie}: {}", table[charlie]);

    // 4. Modify a value
    // 4. 修改值
    if let Some(name) = table.get_mut(bob) {
        name.push_str(" Updated");
    }
    println!("Bob after update: {:?}", table.get(bob));

    // 5. Iterate over the table in storage order
    // 5. 按存储顺序遍历表
    println!("\nIterating:");
    for (handle, value) in table.iter() {
        println!("Handle: {handle:?}, Value: {value}");
    }

    // 6. Erase a value
    // 6. 删除值
    println!("\nErasing Alice...");
    println!("Erased: {}", table.erase(alice));
    println!("Alice exists? {}", table.contains(alice));

    // 7. Demonstrate reuse of slots
    // 7. 演示 slot 复用
    println!("\nInserting Dave (should reuse Alice's slot)...");
    let dave = table.emplace("Dave");

    // alice and dave have the same index but different generations
    // alice 和 dave 具有相同的 index 但 generation 不同
    println!("Alice: index={}, gen={}", alice.index(), alice.generation());
    println!("Dave:  index={}, gen={}", dave.index(), dave.generation());
    println!("Dave value: {:?}", table.get(dave));

    // Old handle is rejected, with the reason
    // 旧 handle 被拒绝，并给出原因
    match table.try_get(alice) {
        Ok(value) => println!("Unexpected: {value}"),
        Err(err) => println!("Accessing with old Alice handle: {err}"),
    }

    // 8. Sort storage by name, handles keep working
    // 8. 按名字排序存储，handle 仍然有效
    let swaps = table.defragment(|a, b| a < b);
    println!("\nDefragmented with {swaps} swaps: {:?}", table.as_slice());
    println!("Dave still resolves: {}", table[dave]);

    // 9. Handles are plain 64-bit values
    // 9. handle 是普通的 64 位值
    let raw = u64::from(dave);
    println!("\nDave raw: {raw:#018x}");
    println!("Round trip: {}", ResourceHandle::from_raw(raw) == dave);
}
