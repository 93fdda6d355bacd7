/**
 * Configuration tests
 *
 * Command line parsing, `glimmer.json` loading and how flags are laid over
 * the file.
 */

#[path = "../util/mod.rs"]
mod utils;

#[cfg(test)]
mod tests {
    use super::utils::Project;
    use clap::Parser;
    use glimmer_compiler::PreprocessMode;
    use glimmer_compiler_cli::config::{read_configuration, CommandLine, OutputFormat, ProjectConfig};
    use std::path::{Path, PathBuf};

    fn parse(args: &[&str]) -> CommandLine {
        let mut argv = vec!["glimmer-precompile"];
        argv.extend_from_slice(args);
        CommandLine::try_parse_from(argv).unwrap_or_else(|error| panic!("{error}"))
    }

    mod command_line {
        use super::*;

        #[test]
        fn should_parse_every_flag() {
            let cli = parse(&[
                "--strict",
                "--module-name",
                "app/hello",
                "--locals",
                "t, Greeting,",
                "--format",
                "module",
                "--out-dir",
                "dist",
                "a.hbs",
                "b/*.hbs",
            ]);
            let mut config = ProjectConfig::default();
            cli.overlay(&mut config);

            assert!(config.options.strict_mode);
            assert_eq!(config.options.module_name(), "app/hello");
            assert_eq!(config.options.locals, ["t", "Greeting"]);
            assert_eq!(config.format, OutputFormat::Module);
            assert_eq!(config.out_dir, Some(PathBuf::from("dist")));
            assert_eq!(config.include, ["a.hbs", "b/*.hbs"]);
        }

        #[test]
        fn should_default_to_json_on_stdout() {
            let mut config = ProjectConfig::default();
            parse(&["a.hbs"]).overlay(&mut config);
            assert!(!config.options.strict_mode);
            assert_eq!(config.format, OutputFormat::Json);
            assert_eq!(config.out_dir, None);
        }

        #[test]
        fn should_reject_unknown_formats() {
            assert!(CommandLine::try_parse_from(["glimmer-precompile", "--format", "yaml"]).is_err());
        }

        #[test]
        fn should_map_verbosity_to_a_log_filter() {
            assert_eq!(parse(&[]).log_filter(), "warn");
            assert_eq!(parse(&["-v"]).log_filter(), "info");
            assert_eq!(parse(&["-vv"]).log_filter(), "debug");
            assert_eq!(parse(&["-vvvv"]).log_filter(), "trace");
        }
    }

    mod config_file {
        use super::*;

        #[test]
        fn should_read_camel_case_options() {
            let project = Project::new();
            let path = project.write(
                "glimmer.json",
                r#"{
                    "strictMode": true,
                    "locals": ["t"],
                    "meta": { "moduleName": "app" },
                    "mode": "codemod",
                    "format": "debug",
                    "outDir": "out",
                    "include": ["src/*.hbs"]
                }"#,
            );
            let config = read_configuration(&path).unwrap();

            assert!(config.options.strict_mode);
            assert_eq!(config.options.locals, ["t"]);
            assert_eq!(config.options.module_name(), "app");
            assert_eq!(config.options.mode, PreprocessMode::Codemod);
            assert_eq!(config.format, OutputFormat::Debug);
            assert_eq!(config.out_dir, Some(project.path("out")));
            assert_eq!(config.include, [project.pattern("src/*.hbs")]);
        }

        #[test]
        fn should_accept_an_empty_object() {
            let project = Project::new();
            let config = read_configuration(&project.write("glimmer.json", "{}")).unwrap();
            assert!(!config.options.strict_mode);
            assert!(config.include.is_empty());
            assert_eq!(config.format, OutputFormat::Json);
        }

        #[test]
        fn should_name_the_file_in_errors() {
            let project = Project::new();
            let path = project.write("glimmer.json", "{ not json");
            let error = read_configuration(&path).unwrap_err();
            assert!(error.to_string().starts_with("invalid configuration in"));

            let missing = read_configuration(&project.path("missing.json")).unwrap_err();
            assert!(missing.to_string().starts_with("failed to read"));
        }

        #[test]
        fn should_let_flags_override_the_file() {
            let project = Project::new();
            let path = project.write(
                "glimmer.json",
                r#"{ "locals": ["x"], "format": "debug", "include": ["a.hbs"] }"#,
            );
            let path = path.to_string_lossy().into_owned();
            let cli = parse(&["--config", path.as_str(), "--locals", "y", "--strict"]);
            let config = cli.resolve().unwrap();

            assert!(config.options.strict_mode);
            assert_eq!(config.options.locals, ["y"]);
            assert_eq!(config.format, OutputFormat::Debug);
            assert_eq!(config.include, [project.pattern("a.hbs")]);
        }
    }

    mod module_names {
        use super::*;

        #[test]
        fn should_name_modules_after_their_input() {
            let options = ProjectConfig::default().precompile_options(Path::new("app/hello.hbs"));
            assert_eq!(options.preprocess.module_name(), "app/hello.hbs");
        }

        #[test]
        fn should_keep_an_explicit_module_name() {
            let mut config = ProjectConfig::default();
            parse(&["--module-name", "shared"]).overlay(&mut config);
            let options = config.precompile_options(Path::new("app/hello.hbs"));
            assert_eq!(options.preprocess.module_name(), "shared");
        }
    }
}
