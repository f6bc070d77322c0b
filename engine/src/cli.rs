//! Line-oriented command parsing for the `vitality` binary
//!
//! Each prompt line is split on whitespace and parsed as one clap
//! subcommand. Names and workout types may span several words.

use clap::{Args, CommandFactory, Parser, Subcommand};
use vitality_shared::catalog::LibraryFilter;
use vitality_shared::{
    ActivityLevel, AppView, FitnessGoal, Gender, Mood, NewProfileInput, NewWorkout,
};

#[derive(Parser, Debug)]
#[command(
    name = "vitality",
    about = "Track workouts, water and mood, and level up as you go",
    no_binary_name = true,
    disable_help_subcommand = true,
    disable_version_flag = true,
    color = clap::ColorChoice::Never
)]
struct PromptLine {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Create an account
    Signup { email: String, password: String },

    /// Sign in
    Login { email: String, password: String },

    /// Sign out
    Logout,

    /// Create your profile
    Onboard(OnboardArgs),

    /// Log a workout, e.g. `workout 30 250 Power Walk`
    Workout {
        minutes: u32,
        calories: u32,
        #[arg(required = true, num_args = 1..)]
        workout_type: Vec<String>,
    },

    /// Log a quick-add preset by its number
    Quick {
        #[arg(value_parser = clap::value_parser!(u16).range(1..))]
        number: u16,
    },

    /// Browse the workout library
    Library {
        /// all, a workout type (HIIT, Yoga, ...) or a difficulty
        #[arg(short, long, default_value = "all")]
        filter: LibraryFilter,

        /// Matched against title and type
        query: Vec<String>,
    },

    /// Log a library workout by id
    LogLibrary { id: String },

    /// Add water, in ml
    Water { ml: u32 },

    /// great, good, neutral, tired or stressed
    Mood { mood: Mood },

    /// Update height and weight
    Metrics { height_cm: f64, weight_kg: f64 },

    /// Show progress
    Dashboard,

    /// dashboard, tracker, advisor or profile
    View { view: AppView },

    /// Toggle dark mode
    Theme,

    /// Ask the AI coach for a plan
    Advice,

    /// Talk to the AI coach
    Chat {
        #[arg(required = true, num_args = 1.., trailing_var_arg = true, allow_hyphen_values = true)]
        message: Vec<String>,
    },

    /// Delete your profile
    Reset,

    /// List commands
    Help,

    #[command(alias = "exit")]
    Quit,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct OnboardArgs {
    pub age: u32,
    pub gender: Gender,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub activity: ActivityLevel,
    pub goal: FitnessGoal,

    /// Target weight in kg; 0 means no target
    #[arg(short, long)]
    pub target: Option<f64>,

    #[arg(required = true, num_args = 1..)]
    pub name: Vec<String>,
}

impl OnboardArgs {
    pub fn into_input(self) -> NewProfileInput {
        NewProfileInput {
            name: self.name.join(" "),
            age: self.age,
            gender: self.gender,
            height_cm: self.height_cm,
            weight_kg: self.weight_kg,
            target_weight_kg: self.target,
            activity_level: self.activity,
            goal: self.goal,
        }
    }
}

impl Command {
    /// The manual workout described by a `workout` line
    pub fn manual_workout(minutes: u32, calories: u32, workout_type: &[String]) -> NewWorkout {
        NewWorkout::manual(workout_type.join(" "), minutes, calories)
    }
}

/// Parse one input line; `Ok(None)` for a blank line
pub fn parse(line: &str) -> Result<Option<Command>, String> {
    let words: Vec<&str> = line.split_whitespace().collect();
    if words.is_empty() {
        return Ok(None);
    }
    PromptLine::try_parse_from(words)
        .map(|parsed| Some(parsed.command))
        .map_err(|e| e.to_string().trim_end().to_string())
}

pub fn help() -> String {
    PromptLine::command().render_help().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use vitality_shared::catalog::Difficulty;

    #[test]
    fn test_blank_line() {
        assert_eq!(parse("   ").unwrap(), None);
    }

    #[test]
    fn test_onboard() {
        let cmd = parse("onboard 29 female 168 64.5 moderate lose_weight --target 60 Alex Rivera")
            .unwrap()
            .unwrap();
        let Command::Onboard(args) = cmd else {
            panic!("expected onboard, got {:?}", cmd);
        };
        let input = args.into_input();
        assert_eq!(input.name, "Alex Rivera");
        assert_eq!(input.age, 29);
        assert_eq!(input.gender, Gender::Female);
        assert_eq!(input.weight_kg, 64.5);
        assert_eq!(input.target_weight_kg, Some(60.0));
        assert_eq!(input.goal, FitnessGoal::LoseWeight);
    }

    #[test]
    fn test_onboard_without_target() {
        let Some(Command::Onboard(args)) = parse("onboard 40 other 180 80 active maintain Sam").unwrap()
        else {
            panic!("expected onboard");
        };
        assert_eq!(args.into_input().target_weight_kg, None);
    }

    #[test]
    fn test_workout_type_spans_words() {
        let Some(Command::Workout { minutes, calories, workout_type }) =
            parse("workout 30 250 Power Walk").unwrap()
        else {
            panic!("expected workout");
        };
        let workout = Command::manual_workout(minutes, calories, &workout_type);
        assert_eq!(workout.workout_type, "Power Walk");
        assert_eq!(workout.duration_minutes, 30);
        assert_eq!(workout.calories_burned, 250);
    }

    #[test]
    fn test_quick_starts_at_one() {
        assert_eq!(parse("quick 1").unwrap(), Some(Command::Quick { number: 1 }));
        assert!(parse("quick 0").is_err());
    }

    #[test]
    fn test_library_filter_and_query() {
        assert_eq!(
            parse("library -f yoga flow").unwrap(),
            Some(Command::Library {
                filter: LibraryFilter::Type("Yoga"),
                query: vec!["flow".to_string()]
            })
        );
        assert_eq!(
            parse("library --filter beginner").unwrap(),
            Some(Command::Library {
                filter: LibraryFilter::Difficulty(Difficulty::Beginner),
                query: Vec::new()
            })
        );
        assert_eq!(
            parse("library torch").unwrap(),
            Some(Command::Library {
                filter: LibraryFilter::All,
                query: vec!["torch".to_string()]
            })
        );
    }

    #[test]
    fn test_chat_keeps_every_word() {
        assert_eq!(
            parse("chat is -5 kg a week too fast?").unwrap(),
            Some(Command::Chat {
                message: ["is", "-5", "kg", "a", "week", "too", "fast?"]
                    .map(String::from)
                    .to_vec()
            })
        );
        assert!(parse("chat").is_err());
    }

    #[test]
    fn test_exit_alias() {
        assert_eq!(parse("exit").unwrap(), Some(Command::Quit));
    }

    #[test]
    fn test_help_lists_commands() {
        let text = help();
        for name in ["signup", "onboard", "log-library", "metrics", "chat", "quit"] {
            assert!(text.contains(name), "missing {} in {}", name, text);
        }
    }

    #[rstest]
    #[case("water lots", "invalid value 'lots'")]
    #[case("mood ecstatic", "Unknown mood")]
    #[case("view settings", "Unknown view")]
    #[case("workout 30", "required arguments were not provided")]
    #[case("dance", "unrecognized subcommand 'dance'")]
    fn test_errors(#[case] line: &str, #[case] expected: &str) {
        let err = parse(line).unwrap_err();
        assert!(err.contains(expected), "{} -> {}", line, err);
    }
}
