//! Print every operation the procedural catalog understands.

use rowforge_generate::strategies::catalog;

fn main() {
    for method in catalog::method_names() {
        println!("{method}");
    }
}
