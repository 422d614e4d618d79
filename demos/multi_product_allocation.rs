//! 多產品庫存分配範例
//!
//! 展示全產品優化掃描與貪心產品組合分配

use bomopt::*;
use rust_decimal::Decimal;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("===== Multi-Product Allocation Example =====\n");

    // 步驟 1: 建立共用庫存與三個產品的 BOM
    println!("[1] Assemble Planning Snapshot");
    let materials = vec![
        Material::new("CHIP-A", "控制晶片", Decimal::from(120))
            .with_stock(Decimal::from(80))
            .stagnant(),
        Material::new("CONN-B", "連接器", Decimal::from(6)).with_stock(Decimal::from(500)),
        Material::new("SHELL-C", "塑膠外殼", Decimal::from(9)).with_stock(Decimal::from(200)),
    ];
    let products = vec![
        Product::new("GW-300", "智慧閘道器", Decimal::from(900)),
        Product::new("RT-200", "工業路由器", Decimal::from(500)),
        Product::new("SW-100", "交換器", Decimal::from(300)),
    ];
    let bom_rows = vec![
        BomRow::new("GW-300", "CHIP-A", Decimal::from(2)),
        BomRow::new("GW-300", "CONN-B", Decimal::from(4)),
        BomRow::new("RT-200", "CHIP-A", Decimal::ONE),
        BomRow::new("RT-200", "SHELL-C", Decimal::ONE),
        BomRow::new("SW-100", "CONN-B", Decimal::from(8)),
        BomRow::new("SW-100", "SHELL-C", Decimal::from(2)),
    ];
    let snapshot = PlanningSnapshot::new(materials, products, bom_rows);
    println!("    庫存總價值: {}\n", snapshot.total_inventory_value());

    // 步驟 2: 全產品優化掃描
    println!("[2] Rank Products by Consumable Value");
    let rankings = rank_products(&snapshot);
    for result in &rankings {
        println!(
            "    {}{}: 可消納 {} 最大可生產 {} 件 (不補料 {} 件)",
            result.product.code,
            if result.is_recommended { " ★" } else { "" },
            result.consumable_value,
            result.max_producible_quantity,
            result.min_producible_quantity
        );
    }
    println!();

    // 步驟 3: 貪心分配產品組合
    println!("[3] Optimize Product Mix");
    let result = optimize_mix(snapshot.products(), &snapshot);
    for allocation in &result.product_mix {
        println!(
            "    {} × {} 件，消納 {}",
            allocation.product.code, allocation.quantity, allocation.consumed_value
        );
    }
    println!();

    // 步驟 4: 分配後的殘留庫存
    println!("[4] Unconsumed Inventory");
    for unconsumed in &result.unconsumed_materials {
        println!(
            "    {}: 剩 {} (價值 {})",
            unconsumed.material.code, unconsumed.remaining_quantity, unconsumed.remaining_value
        );
    }
    println!(
        "\n    消納總價值: {} 優化分數: {}",
        result.total_consumed_value, result.optimization_score
    );

    println!("\n===== Allocation Complete =====");
}
