use anyhow::Result;
use kremlin::{
    drop_elements, execute, props, Element, GraphStore, PipelineBuilder, PropertyValue, Seeds,
    TraversalError, DEFAULT_INFLATE_DEPTH,
};

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    println!("Kremlin v{}", kremlin::version());
    println!("==========================================");
    println!();

    let store = build_modern_graph()?;
    println!("Graph: {} vertices, {} edges", store.vertex_count(), store.edge_count());

    demo_traversals(&store)?;
    demo_errors(&store)?;
    demo_drop(store)?;

    Ok(())
}

/// The small "modern" social graph used throughout the demos
fn build_modern_graph() -> Result<GraphStore> {
    let mut store = GraphStore::new();

    let marko = store.add_vertex_with_label("person", props! { "name" => "marko", "age" => 29 })?;
    let vadas = store.add_vertex_with_label("person", props! { "name" => "vadas", "age" => 27 })?;
    let lop = store.add_vertex_with_label("software", props! { "name" => "lop", "lang" => "java" })?;
    let josh = store.add_vertex_with_label("person", props! { "name" => "josh", "age" => 32 })?;
    let ripple =
        store.add_vertex_with_label("software", props! { "name" => "ripple", "lang" => "java" })?;
    let peter = store.add_vertex_with_label("person", props! { "name" => "peter", "age" => 35 })?;

    store.add_edge(marko, vadas, "knows", props! { "weight" => 0.5 })?;
    store.add_edge(marko, josh, "knows", props! { "weight" => 1.0 })?;
    store.add_edge(marko, lop, "created", props! { "weight" => 0.4 })?;
    store.add_edge(josh, ripple, "created", props! { "weight" => 1.0 })?;
    store.add_edge(josh, lop, "created", props! { "weight" => 0.4 })?;
    store.add_edge(peter, lop, "created", props! { "weight" => 0.2 })?;

    Ok(store)
}

fn show(elements: &[Element]) -> String {
    elements
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn demo_traversals(store: &GraphStore) -> Result<()> {
    println!("\n=== Traversals ===");

    let marko = store
        .vertices_by_label("person")
        .into_iter()
        .find(|v| v.get_property("name") == Some(&PropertyValue::from("marko")))
        .map(|v| v.id)
        .ok_or_else(|| anyhow::anyhow!("marko is missing"))?;

    // g.V(marko).out("knows").values("name")
    let friends = PipelineBuilder::vertices()
        .out(&["knows"])
        .property("name")
        .compile()?;
    let names = execute(&friends, store, marko).to_list(None)?;
    println!("marko knows: [{}]", show(&names));

    // g.V().hasLabel("software").in("created").dedup().values("name")
    let creators = PipelineBuilder::vertices()
        .has_label("software")
        .in_(&["created"])
        .dedup()
        .property("name")
        .compile()?;
    let names = execute(&creators, store, Seeds::AllVertices).to_list(None)?;
    println!("creators: [{}]", show(&names));

    // g.V().has("age").filter(age > 30).count()
    let seniors = PipelineBuilder::vertices()
        .has_key("age")
        .filter(|v| {
            v.property("age")
                .and_then(PropertyValue::as_integer)
                .map_or(false, |age| age > 30)
        })
        .compile()?;
    let n = execute(&seniors, store, Seeds::AllVertices).count_results()?;
    println!("people over 30: {}", n);

    // g.V(marko).outE("created").elementMap()
    let created = PipelineBuilder::vertices()
        .out_e(&["created"])
        .element_map()
        .compile()?;
    if let Some(edge) = execute(&created, store, marko).first()? {
        println!("marko created: {}", edge);
    }

    // g.V(marko).repeat(outE().inV()).times(2).emit().values("name")
    let reachable = PipelineBuilder::vertices()
        .repeat_emit(PipelineBuilder::vertices().out_e(&[]).out(&[]), 2)
        .property("name")
        .compile()?;
    let names = execute(&reachable, store, marko).to_list(None)?;
    println!("within two hops of marko: [{}]", show(&names));

    // Persons with what they point to, nested by edge label
    let inflated = PipelineBuilder::vertices()
        .has_label("person")
        .limit(50)
        .inflate_edges(DEFAULT_INFLATE_DEPTH)
        .compile()?;
    if let Some(tree) = execute(&inflated, store, Seeds::AllVertices).first()? {
        println!("marko inflated: {}", tree);
    }

    Ok(())
}

fn demo_errors(store: &GraphStore) -> Result<()> {
    println!("\n=== Errors ===");

    match PipelineBuilder::vertices().out(&[]).limit(-1).compile() {
        Err(err) => println!("compile: {}", err),
        Ok(_) => println!("compile: unexpectedly accepted a negative limit"),
    }

    let all = PipelineBuilder::vertices().limit(2).compile()?;
    let mut cursor = execute(&all, store, Seeds::AllVertices);
    let taken = cursor.to_list(None)?;
    println!("took {} vertices", taken.len());
    if let Err(err @ TraversalError::ExhaustedCursor) = cursor.first() {
        println!("second terminal: {}", err);
    }

    Ok(())
}

fn demo_drop(mut store: GraphStore) -> Result<()> {
    println!("\n=== Drop ===");

    // g.V().hasLabel("software").drop()
    let software = PipelineBuilder::vertices().has_label("software").compile()?;
    let removed = drop_elements(&software, &mut store, Seeds::AllVertices)?;
    println!(
        "dropped {} vertices, {} vertices and {} edges left",
        removed,
        store.vertex_count(),
        store.edge_count()
    );

    Ok(())
}
