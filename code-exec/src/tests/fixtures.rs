/// Test code samples for different languages
pub mod code_samples {
    pub const PYTHON_HI: &str = r#"print("hi")"#;
    pub const PYTHON_HELLO: &str = r#"print("Hello, World!")"#;
    pub const RUST_HELLO: &str = r#"
        fn main() {
            println!("Hello, World!");
        }
    "#;
    pub const C_HELLO: &str = r#"
        #include <stdio.h>

        int main(void) {
            printf("Hello, World!\n");
            return 0;
        }
    "#;
    pub const CPP_HELLO: &str = r#"
        #include <iostream>

        int main() {
            std::cout << "Hello, World!" << std::endl;
            return 0;
        }
    "#;
    pub const GO_HELLO: &str = r#"package main

import "fmt"

func main() {
    fmt.Println("Hello, World!")
}"#;
}

/// Samples that fail at a known stage
pub mod failing_samples {
    pub const PYTHON_RAISES: &str = r#"raise ValueError("boom")"#;
    pub const RUST_SYNTAX_ERROR: &str = r#"
        fn main() {
            println!("missing semicolon")
            let x = ;
        }
    "#;
    pub const RUST_PANICS: &str = r#"
        fn main() {
            panic!("runtime failure");
        }
    "#;
    pub const C_SYNTAX_ERROR: &str = "int main(void) { return 0 }\n";
    pub const C_SILENT: &str = "int main(void) { return 0; }\n";
    pub const GO_SYNTAX_ERROR: &str = "package main\n\nfunc main() {\n";
}

/// Shell snippets used with `sh -c` standing in for the Python interpreter
pub mod shell_snippets {
    pub const GUI_FINISHES: &str = "true # import tkinter";
    pub const GUI_EXITS_NONZERO: &str = "exit 4 # PyQt6";
    pub const GUI_CRASHES: &str = "kill -9 $$ # PyQt6";
    pub const GUI_LINGERS: &str = "sleep 30 # Tkinter";
}
