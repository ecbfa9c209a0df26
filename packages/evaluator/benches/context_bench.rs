use criterion::{black_box, criterion_group, criterion_main, Criterion};
use formtree_evaluator::{GenerateContexts, JsonDataAccessor};
use formtree_instance::{DataElement, DataType, Instance};
use formtree_layout::{LayoutModel, LayoutSet, Page, RawComponent};
use serde_json::json;

fn nested_model() -> LayoutModel {
    let page = Page::from_components(
        "page1",
        vec![
            RawComponent::new("people", "RepeatingGroup")
                .with_binding("group", "people")
                .with_children(&["name", "addresses"]),
            RawComponent::new("name", "Input").with_binding("simpleBinding", "people.name"),
            RawComponent::new("addresses", "RepeatingGroup")
                .with_binding("group", "people.addresses")
                .with_children(&["street", "zip"]),
            RawComponent::new("street", "Input").with_binding("simpleBinding", "people.addresses.street"),
            RawComponent::new("zip", "Input").with_binding("simpleBinding", "people.addresses.zip"),
        ],
    )
    .unwrap();
    let set = LayoutSet::new("main", DataType::new("model"), vec![page]).unwrap();
    LayoutModel::new(vec![set], None).unwrap()
}

fn generate_nested_repeating_groups(c: &mut Criterion) {
    let model = nested_model();
    let element = DataElement::new("main-1", "model");
    let instance = Instance::new("1/bench").with_data_element(element.clone());

    let people: Vec<_> = (0..50)
        .map(|i| {
            json!({
                "name": format!("person {i}"),
                "addresses": (0..10).map(|j| json!({ "street": format!("street {j}"), "zip": "0000" })).collect::<Vec<_>>()
            })
        })
        .collect();
    let accessor = JsonDataAccessor::new().with_element(&element, json!({ "people": people }));

    let runtime = tokio::runtime::Runtime::new().unwrap();
    let (model, instance, accessor) = (&model, &instance, &accessor);
    c.bench_function("generate_nested_repeating_groups", |b| {
        b.to_async(&runtime).iter(|| async move {
            model
                .generate_component_contexts(black_box(instance), black_box(accessor))
                .await
                .map(|contexts| contexts.len())
        })
    });
}

criterion_group!(benches, generate_nested_repeating_groups);
criterion_main!(benches);
