//! Interactive, line-oriented form session.
//!
//! Each input line is one UI event:
//!
//! ```text
//! nome <valor>     set Nome
//! curso <valor>    set Curso
//! ira <valor>      set Ira (clamped to 0..=10)
//! enviar           submit
//! estado           show draft and banner
//! ajuda            show commands
//! sair             leave
//! ```

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

use crate::error::Result;
use crate::form::{RecordCreationForm, SubmitOutcome};
use crate::record::Field;
use crate::service::{DatabaseHandle, RecordService};

use super::render;

const HELP: &str = "\
Comandos:
  nome <valor>    Nome do aluno
  curso <valor>   Curso
  ira <valor>     Ira (0 a 10)
  enviar          Criar aluno
  estado          Mostrar formulário
  ajuda           Mostrar esta ajuda
  sair            Encerrar
";

/// A parsed session line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormCommand {
    /// Set a text field to the rest of the line, verbatim.
    Set(Field, String),
    /// Grade keystroke input.
    Grade(String),
    /// Submit the form.
    Submit,
    /// Print draft and banner.
    Show,
    /// Print the command list.
    Help,
    /// Leave the session.
    Quit,
}

impl FormCommand {
    /// Parse one input line. Blank lines yield `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns a message for unknown commands.
    pub fn parse(line: &str) -> std::result::Result<Option<Self>, String> {
        let line = line.trim_end_matches(['\r', '\n']);
        let trimmed = line.trim_start();
        if trimmed.is_empty() {
            return Ok(None);
        }

        let (word, rest) = match trimmed.split_once(' ') {
            Some((word, rest)) => (word, rest),
            None => (trimmed, ""),
        };

        let command = match word.to_lowercase().as_str() {
            "nome" => Self::Set(Field::Name, rest.to_string()),
            "curso" => Self::Set(Field::Course, rest.to_string()),
            "ira" => Self::Grade(rest.to_string()),
            "enviar" => Self::Submit,
            "estado" => Self::Show,
            "ajuda" | "?" => Self::Help,
            "sair" => Self::Quit,
            other => return Err(format!("comando desconhecido: {other} (digite 'ajuda')")),
        };
        Ok(Some(command))
    }
}

/// Drive `form` from `input` until EOF or `sair`, writing feedback to `output`.
///
/// Submissions are awaited so that their banner can be printed right away.
///
/// # Errors
///
/// Returns an error if reading input or writing output fails.
pub async fn run<D, R, I, O>(
    form: &RecordCreationForm<D, R>,
    input: I,
    mut output: O,
) -> Result<()>
where
    D: DatabaseHandle,
    R: RecordService<D::Session>,
    I: AsyncBufRead + Unpin,
    O: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    output.write_all(HELP.as_bytes()).await?;
    output.flush().await?;

    while let Some(line) = lines.next_line().await? {
        let command = match FormCommand::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                output.write_all(format!("{message}\n").as_bytes()).await?;
                output.flush().await?;
                continue;
            }
        };
        debug!(?command, "Form session command");

        let reply = match command {
            FormCommand::Set(field, value) => {
                form.update_field(field, value);
                None
            }
            FormCommand::Grade(raw) => {
                let stored = form.update_grade(&raw);
                Some(match stored {
                    Some(grade) => format!("Ira: {grade}\n"),
                    None => "Ira: (vazio)\n".to_string(),
                })
            }
            FormCommand::Submit => {
                match form.submit() {
                    SubmitOutcome::Pending(pending) => {
                        // The outcome is reflected in the banner.
                        let _ = pending.wait().await;
                    }
                    SubmitOutcome::Rejected(_) => {}
                    SubmitOutcome::InFlight => {
                        output.write_all(b"Aguarde o envio anterior.\n").await?;
                    }
                }
                render::banner(&form.banner()).map(|b| format!("{b}\n"))
            }
            FormCommand::Show => {
                let mut text = String::new();
                if let Some(banner) = render::banner(&form.banner()) {
                    text.push_str(&banner);
                    text.push('\n');
                }
                text.push_str(&render::draft(&form.draft()));
                Some(text)
            }
            FormCommand::Help => Some(HELP.to_string()),
            FormCommand::Quit => break,
        };

        if let Some(reply) = reply {
            output.write_all(reply.as_bytes()).await?;
        }
        output.flush().await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FormConfig;
    use crate::service::{SqliteDatabase, StudentService};
    use crate::storage::Storage;
    use std::sync::Arc;

    #[test]
    fn test_parse_set_keeps_value_verbatim() {
        assert_eq!(
            FormCommand::parse("nome Ana  Maria ").unwrap(),
            Some(FormCommand::Set(Field::Name, "Ana  Maria ".to_string()))
        );
        assert_eq!(
            FormCommand::parse("curso").unwrap(),
            Some(FormCommand::Set(Field::Course, String::new()))
        );
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            FormCommand::parse("ira 15").unwrap(),
            Some(FormCommand::Grade("15".to_string()))
        );
        assert_eq!(FormCommand::parse("ENVIAR").unwrap(), Some(FormCommand::Submit));
        assert_eq!(FormCommand::parse("estado\r\n").unwrap(), Some(FormCommand::Show));
        assert_eq!(FormCommand::parse("?").unwrap(), Some(FormCommand::Help));
        assert_eq!(FormCommand::parse("sair").unwrap(), Some(FormCommand::Quit));
        assert_eq!(FormCommand::parse("   ").unwrap(), None);
        assert!(FormCommand::parse("apagar").is_err());
    }

    async fn run_script(script: &str) -> (String, Arc<SqliteDatabase>) {
        let database = Arc::new(SqliteDatabase::in_memory().unwrap());
        let form = RecordCreationForm::new(
            Arc::clone(&database),
            Arc::new(StudentService),
            FormConfig::default(),
        );
        let mut output = Vec::new();
        run(&form, script.as_bytes(), &mut output).await.unwrap();
        (String::from_utf8(output).unwrap(), database)
    }

    #[tokio::test]
    async fn test_session_creates_student() {
        let (output, database) =
            run_script("nome Ana\ncurso CS\nira 15\nenviar\nestado\nsair\n").await;

        assert!(output.contains("Ira: 10\n"));
        assert!(output.contains("[OK] Aluno criado com sucesso!"));
        assert!(output.contains("Nome: \n"));

        let count = database.session().unwrap().with(Storage::count).unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_session_prints_negative_zero_grade_as_zero() {
        let (output, _) = run_script("ira -0\nsair\n").await;
        assert!(output.contains("Ira: 0\n"));
        assert!(!output.contains("-0"));
    }

    #[tokio::test]
    async fn test_session_rejects_incomplete_draft() {
        let (output, database) = run_script("curso CS\nira 5\nenviar\n").await;

        assert!(output.contains("[ERRO] Por favor, preencha todos os campos."));
        let count = database.session().unwrap().with(Storage::count).unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_session_reports_unknown_commands_and_stops_at_quit() {
        let (output, database) = run_script("apagar\nsair\nnome Ana\ncurso CS\nira 1\nenviar\n").await;

        assert!(output.contains("comando desconhecido: apagar"));
        let count = database.session().unwrap().with(Storage::count).unwrap();
        assert_eq!(count, 0);
    }
}
