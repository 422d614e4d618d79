//! 呆滯庫存消納方案完整範例
//!
//! 展示從 BOM 展開到兩種生產方案與 MOQ 補料分析的完整流程

use bomopt::*;
use rust_decimal::Decimal;
use std::collections::HashMap;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("===== Stagnant Inventory Planning Example =====\n");

    // 步驟 1: 建立物料主檔（含呆滯庫存）
    println!("[1] Create Materials");
    let materials = vec![
        Material::new("CASE-01", "鋁合金外殼", Decimal::from(25))
            .with_stock(Decimal::from(130))
            .with_storage_days(220)
            .stagnant(),
        Material::new("PCB-01", "主控板", Decimal::from(80)).with_stock(Decimal::from(40)),
        Material::new("PCB-02", "相容主控板", Decimal::from(70))
            .with_stock(Decimal::from(60))
            .with_storage_days(300)
            .stagnant(),
        Material::new("SCREW-M3", "M3 螺絲", Decimal::new(5, 1)),
    ];
    for material in &materials {
        println!(
            "    {}: 庫存 {} 單價 {}{}",
            material.code,
            material.current_stock,
            material.unit_price,
            if material.is_stagnant { " (呆滯)" } else { "" }
        );
    }
    println!();

    // 步驟 2: 建立 BOM（PCB-02 為 PCB-01 的替代料）
    println!("[2] Create BOM Structure");
    let bom_rows = vec![
        BomRow::new("CTRL-100", "CASE-01", Decimal::from(2)),
        BomRow::new("CTRL-100", "PCB-01", Decimal::ONE).in_group("G1"),
        BomRow::new("CTRL-100", "PCB-02", Decimal::ONE).as_substitute_in("G1"),
        BomRow::new("CTRL-100", "SCREW-M3", Decimal::from(8)),
    ];
    println!("    CTRL-100 = 2 CASE-01 + 1 PCB-01 (替代: PCB-02) + 8 SCREW-M3\n");

    // 步驟 3: 組裝計算快照
    println!("[3] Assemble Planning Snapshot");
    let products = vec![Product::new("CTRL-100", "工業控制器", Decimal::from(600))];
    let moq_table = HashMap::from([
        ("SCREW-M3".to_string(), Decimal::from(1000)),
        ("PCB-01".to_string(), Decimal::from(20)),
    ]);
    let snapshot =
        PlanningSnapshot::new(materials, products, bom_rows).with_moq_table(moq_table.clone());
    println!("    庫存總價值: {}\n", snapshot.total_inventory_value());

    // 步驟 4: 展開 BOM
    println!("[4] Expand BOM");
    let tree = expand_bom("CTRL-100", snapshot.bom_rows(), Decimal::ONE).unwrap();
    print!("{}", format_tree(&tree));
    let stats = tree_stats(&tree);
    println!(
        "    節點 {} 個，底層物料 {} 種，深度 {}\n",
        stats.total_nodes, stats.unique_materials, stats.max_depth
    );

    // 步驟 5: 解析替代料關係
    println!("[5] Parse Substitution Relations");
    let relations = parse_substitution_relations(snapshot.bom_rows(), snapshot.materials());
    for relation in &relations {
        println!(
            "    {} → {} (比例 {} 成本差 {})",
            relation.primary_code, relation.substitute_code, relation.ratio,
            relation.cost_difference
        );
    }
    println!();

    // 步驟 6: 計算兩種生產方案
    println!("[6] Calculate Production Plans");
    let selected: Vec<Material> = snapshot
        .materials()
        .values()
        .filter(|material| material.is_stagnant)
        .cloned()
        .collect();
    let (max_consumption, min_waste) = plan_product("CTRL-100", &selected, &snapshot).unwrap();

    println!("    方案 A (最大化消納):");
    print_plan(&max_consumption);
    println!("    方案 B (最小化余料):");
    print_plan(&min_waste);

    // 步驟 7: MOQ 補料分析（按方案 A 的產量）
    println!("[7] MOQ Supplement Analysis");
    let requirements = leaf_requirements(&tree);
    let analysis = MoqCalculator::analyze(
        max_consumption.quantity,
        &requirements,
        &snapshot.inventory_map(),
        snapshot.moq_table(),
        snapshot.materials(),
    );
    for item in &analysis {
        println!(
            "    {}: 缺口 {} MOQ {} 訂貨 {} 過剩金額 {}",
            item.material_code, item.shortage, item.moq, item.order_quantity, item.excess_value
        );
    }

    println!("\n===== Planning Complete =====");
}

fn print_plan(plan: &ProductionPlan) {
    println!("      產量: {} 件", plan.quantity);
    println!("      產出價值: {}", plan.output_value);
    println!("      補料成本: {}", plan.total_cost);
    println!("      余料價值: {}", plan.waste_value);
    println!("      消納率: {}%", plan.consumption_rate.round_dp(1));
    println!("      ROI: {}", plan.roi);
    for usage in &plan.materials_used {
        println!(
            "      - {} 用 {} 剩 {}",
            usage.material.code, usage.used_quantity, usage.remaining_quantity
        );
    }
    println!();
}
