//  ██████╗  █████╗ ███████╗███████╗██╗███╗   ██╗ ██████╗
//  ██╔══██╗██╔══██╗██╔════╝██╔════╝██║████╗  ██║██╔════╝
//  ██████╔╝███████║███████╗███████╗██║██╔██╗ ██║██║  ███╗
//  ██╔═══╝ ██╔══██║╚════██║╚════██║██║██║╚██╗██║██║   ██║
//  ██║     ██║  ██║███████║███████║██║██║ ╚████║╚██████╔╝
//  ╚═╝     ╚═╝  ╚═╝╚══════╝╚══════╝╚═╝╚═╝  ╚═══╝ ╚═════╝

#[cfg(test)]
mod passing {
    use std::fs;

    use markup5ever_rcdom::{Handle, NodeData};
    use tempfile::TempDir;

    use htmlpack::core::{BundleOptions, Session};
    use htmlpack::manifest::Manifest;
    use htmlpack::parsers::html::dom::{find_nodes, get_node_attr, html_to_dom};
    use htmlpack::parsers::html::walker::transform;
    use htmlpack::utils::webpath::Webpath;

    fn session_for(dir: &TempDir, files: &[(&str, &str)], input_path: &str) -> Session {
        let mut manifest = Manifest::new();
        for (webpath, content) in files {
            let file_path = dir.path().join(webpath.trim_start_matches('/'));
            fs::create_dir_all(file_path.parent().unwrap()).unwrap();
            fs::write(&file_path, content).unwrap();
            manifest.insert(Webpath::new(webpath), file_path);
        }

        Session::new(
            manifest,
            BundleOptions {
                input_path: input_path.to_string(),
                output_path: input_path.to_string(),
                js_path: String::new(),
                charset: None,
            },
        )
    }

    fn first_text(node: &Handle) -> String {
        let children = node.children.borrow();
        match children.first().map(|child| &child.data) {
            Some(NodeData::Text { contents }) => contents.borrow().to_string(),
            _ => String::new(),
        }
    }

    #[test]
    fn descends_into_spliced_subdocument() {
        let dir = TempDir::new().unwrap();
        let mut session = session_for(
            &dir,
            &[
                ("/sub.html", "<head><link rel=\"stylesheet\" href=\"sub.css\"></head><body></body>"),
                ("/sub.css", "span { color: red }"),
            ],
            "/index.html",
        );

        let dom = html_to_dom(
            b"<html><head><link rel=\"import\" href=\"sub.html\"></head><body></body></html>",
            "".to_string(),
        );
        let root = transform(&mut session, &dom.document).unwrap();

        // The stylesheet link lived inside the spliced-in document, so it
        // only gets inlined if the walker continued into the replacement
        let styles = find_nodes(&root, vec!["html", "style"]);
        assert_eq!(styles.len(), 1);
        assert_eq!(first_text(&styles[0]), "span { color: red }");
        assert!(find_nodes(&root, vec!["html", "link"]).is_empty());
    }

    #[test]
    fn continues_past_elided_import() {
        let dir = TempDir::new().unwrap();
        let mut session = session_for(
            &dir,
            &[
                ("/sub.html", "<head></head><body><p>sub</p></body>"),
                ("/main.css", "p { margin: 0 }"),
            ],
            "/index.html",
        );

        let dom = html_to_dom(
            concat!(
                "<html><head>",
                "<link rel=\"import\" href=\"sub.html\">",
                "<link rel=\"import\" href=\"sub.html\">",
                "<link rel=\"stylesheet\" href=\"main.css\">",
                "</head><body></body></html>"
            )
            .as_bytes(),
            "".to_string(),
        );
        let root = transform(&mut session, &dom.document).unwrap();

        // The second import collapses to an empty placeholder; traversal
        // must still reach the stylesheet after it
        let styles = find_nodes(&root, vec!["html", "style"]);
        assert_eq!(styles.len(), 1);
        assert_eq!(first_text(&styles[0]), "p { margin: 0 }");
        assert!(find_nodes(&root, vec!["html", "link"]).is_empty());

        let paragraphs = find_nodes(&root, vec!["html", "p"]);
        assert_eq!(paragraphs.len(), 1);
    }

    #[test]
    fn resolves_references_against_the_importing_document() {
        let dir = TempDir::new().unwrap();
        let mut session = session_for(
            &dir,
            &[
                (
                    "/widgets/inner.html",
                    "<head><link rel=\"stylesheet\" href=\"inner.css\"></head><body></body>",
                ),
                ("/widgets/inner.css", "b { font-weight: bold }"),
            ],
            "/index.html",
        );

        let dom = html_to_dom(
            b"<html><head><link rel=\"import\" href=\"widgets/inner.html\"></head><body></body></html>",
            "".to_string(),
        );
        let root = transform(&mut session, &dom.document).unwrap();

        // "inner.css" is only resolvable relative to /widgets/inner.html,
        // which proves the context stack tracked the entered document
        let styles = find_nodes(&root, vec!["html", "style"]);
        assert_eq!(styles.len(), 1);
        assert_eq!(first_text(&styles[0]), "b { font-weight: bold }");
    }

    #[test]
    fn leaves_marked_scripts_alone() {
        let dir = TempDir::new().unwrap();
        let mut session = session_for(&dir, &[("/app.js", "app();")], "/index.html");

        let dom = html_to_dom(
            b"<html><head><script src=\"app.js\" data-no-inline></script></head><body></body></html>",
            "".to_string(),
        );
        let root = transform(&mut session, &dom.document).unwrap();

        let scripts = find_nodes(&root, vec!["html", "script"]);
        assert_eq!(scripts.len(), 1);
        assert_eq!(first_text(&scripts[0]), "");
        assert_eq!(
            get_node_attr(&scripts[0], "src"),
            Some("app.js".to_string())
        );
    }
}

//  ███████╗ █████╗ ██╗██╗     ██╗███╗   ██╗ ██████╗
//  ██╔════╝██╔══██╗██║██║     ██║████╗  ██║██╔════╝
//  █████╗  ███████║██║██║     ██║██╔██╗ ██║██║  ███╗
//  ██╔══╝  ██╔══██║██║██║     ██║██║╚██╗██║██║   ██║
//  ██║     ██║  ██║██║███████╗██║██║ ╚████║╚██████╔╝
//  ╚═╝     ╚═╝  ╚═╝╚═╝╚══════╝╚═╝╚═╝  ╚═══╝ ╚═════╝

#[cfg(test)]
mod failing {
    use std::fs;

    use tempfile::TempDir;

    use htmlpack::core::{BundleError, BundleOptions, Session};
    use htmlpack::manifest::Manifest;
    use htmlpack::parsers::html::dom::html_to_dom;
    use htmlpack::parsers::html::walker::transform;
    use htmlpack::utils::webpath::Webpath;

    #[test]
    fn unresolved_import_aborts_the_walk() {
        let dir = TempDir::new().unwrap();
        let file_path = dir.path().join("index.html");
        fs::write(&file_path, "<html></html>").unwrap();

        let mut manifest = Manifest::new();
        manifest.insert(Webpath::new("/index.html"), file_path);

        let mut session = Session::new(
            manifest,
            BundleOptions {
                input_path: "/index.html".to_string(),
                output_path: "/index.html".to_string(),
                js_path: String::new(),
                charset: None,
            },
        );

        let dom = html_to_dom(
            b"<html><head><link rel=\"import\" href=\"missing.html\"></head></html>",
            "".to_string(),
        );
        let error = transform(&mut session, &dom.document)
            .err()
            .expect("expected the walk to abort");

        match error {
            BundleError::UnresolvedReference { path, referrer } => {
                assert_eq!(path.as_str(), "/missing.html");
                assert_eq!(referrer.as_str(), "/index.html");
            }
            other => panic!("expected an unresolved reference error, got {other}"),
        }
    }
}
