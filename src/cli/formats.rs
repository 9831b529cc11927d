use crate::parser::known_formats;

pub fn execute() -> anyhow::Result<()> {
    for name in known_formats() {
        println!("{}", name);
    }
    Ok(())
}
