use encoding_rs::Encoding;
use html5ever::serialize::{serialize, SerializeOpts, TraversalScope};
use markup5ever_rcdom::{Handle, RcDom, SerializableHandle};

/// Serializes the whole document. html5ever emits markup verbatim, with no
/// pretty-printing, which keeps template whitespace intact. When a charset
/// label is given and known, the output is re-encoded with it.
pub fn serialize_document(dom: RcDom, document_encoding: Option<String>) -> Vec<u8> {
    let mut buf: Vec<u8> = Vec::new();

    let serializable: SerializableHandle = dom.document.into();
    serialize(&mut buf, &serializable, SerializeOpts::default())
        .expect("Unable to serialize DOM into buffer");

    if let Some(label) = document_encoding {
        if let Some(encoding) = Encoding::for_label(label.as_bytes()) {
            let s: &str = &String::from_utf8_lossy(&buf);
            let (data, _, _) = encoding.encode(s);
            buf = data.to_vec();
        }
    }

    buf
}

/// Markup of a single node, for diagnostics.
pub fn serialize_node(node: &Handle) -> String {
    let mut buf: Vec<u8> = Vec::new();

    let serializable: SerializableHandle = node.clone().into();
    serialize(
        &mut buf,
        &serializable,
        SerializeOpts {
            traversal_scope: TraversalScope::IncludeNode,
            ..Default::default()
        },
    )
    .expect("Unable to serialize DOM into buffer");

    String::from_utf8_lossy(&buf).to_string()
}
