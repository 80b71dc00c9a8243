use codemap_core::{Document, ReferenceDescriptor, SymbolRecord};

/// Synthetic project: `pkg/mod_<i>.py` files with a few functions and one class
/// each, every function calling into the previous file and every class method
/// calling a function `stride` files away.
pub fn generate_synthetic_document(file_count: usize, stride: usize) -> Document {
    let mut document = Document::new();
    for i in 0..file_count {
        let path = format!("pkg/mod_{i}.py");
        let prev = i.checked_sub(1).unwrap_or(file_count.saturating_sub(1));
        let far = (i + stride) % file_count.max(1);

        for f in 0..3 {
            let record = SymbolRecord::function(&["x"]).with_reference(
                &format!("func_{prev}_{f}"),
                ReferenceDescriptor::Module(format!("pkg.mod_{prev}")),
            );
            document.insert_symbol(&path, &format!("func_{i}_{f}"), record);
        }

        let method = SymbolRecord::function(&["self"]).with_reference(
            &format!("func_{far}_0"),
            ReferenceDescriptor::Structured {
                file: Some(format!("from pkg.mod_{far} import func_{far}_0")),
                methods: Vec::new(),
            },
        );
        document.insert_symbol(
            &path,
            &format!("Class_{i}"),
            SymbolRecord::class().with_method("run", method),
        );
    }
    document
}

/// The same project as loosely-typed JSON, for decode benchmarks.
pub fn generate_synthetic_json(file_count: usize, stride: usize) -> String {
    let document = generate_synthetic_document(file_count, stride);
    serde_json::to_string(&document).unwrap_or_default()
}
