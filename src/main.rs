use std::{env, fs::read_to_string, path::Path, process::ExitCode, rc::Rc, time::Instant};

use hotpot::{
    display_error,
    lexer::lexer::tokenize,
    parser::parser::parse,
    type_checker::type_checker::{type_check, LocalResolution, TypeCheckOptions},
};

const USAGE: &str = "Usage: hotpot [--tokens] [--last-declaration-wins] <file>";

fn main() -> ExitCode {
    let mut show_tokens = false;
    let mut options = TypeCheckOptions::default();
    let mut file_path = None;

    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--tokens" => show_tokens = true,
            "--last-declaration-wins" => options.resolution = LocalResolution::LastDeclaration,
            _ if arg.starts_with("--") || file_path.is_some() => {
                eprintln!("{}", USAGE);
                return ExitCode::from(2);
            }
            _ => file_path = Some(arg),
        }
    }

    let Some(file_path) = file_path else {
        eprintln!("{}", USAGE);
        return ExitCode::from(2);
    };

    let file_name = Path::new(&file_path)
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| file_path.clone());

    let file_contents = match read_to_string(&file_path) {
        Ok(contents) => contents,
        Err(error) => {
            eprintln!("Failed to read {}: {}", file_path, error);
            return ExitCode::from(2);
        }
    };

    let start = Instant::now();
    let tokens = match tokenize(file_contents.clone(), Some(file_name.clone())) {
        Ok(tokens) => tokens,
        Err(error) => {
            display_error(&error, &file_contents, &file_path);
            return ExitCode::FAILURE;
        }
    };

    println!("Tokenized in {:?}", start.elapsed());

    if show_tokens {
        for token in &tokens {
            token.debug();
        }
    }

    let parse_start = Instant::now();
    let program = match parse(tokens, Rc::new(file_name)) {
        Ok(program) => program,
        Err(error) => {
            display_error(&error, &file_contents, &file_path);
            return ExitCode::FAILURE;
        }
    };

    println!("Parsed in {:?}", parse_start.elapsed());

    let type_check_start = Instant::now();
    if let Err(error) = type_check(&program, options) {
        display_error(&error, &file_contents, &file_path);
        return ExitCode::FAILURE;
    }

    println!("Type checked in {:?}", type_check_start.elapsed());
    println!(
        "Checked {} globals, {} hotpots and {} functions in {:?}",
        program.globals().len(),
        program.hotpots().len(),
        program.functions().len() + usize::from(program.main().is_some()),
        start.elapsed()
    );

    ExitCode::SUCCESS
}
