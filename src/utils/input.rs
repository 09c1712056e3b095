use std::io::{self, BufRead, Write};

use rpassword::read_password;

/// 打印提示并读取一行，去掉首尾空白。输入流结束时返回 `UnexpectedEof`
pub fn input(prompt: &str) -> io::Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?; // 确保提示符立即输出

    read_trimmed_line(&mut io::stdin().lock())
}

/// 密码不做裁剪，`read_password` 只去掉换行
pub fn input_password(prompt: &str) -> io::Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;
    read_password()
}

fn read_trimmed_line<R: BufRead>(reader: &mut R) -> io::Result<String> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
    }
    Ok(line.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn lines_are_trimmed() {
        let mut reader = Cursor::new("  next \nquit\n");
        assert_eq!(read_trimmed_line(&mut reader).unwrap(), "next");
        assert_eq!(read_trimmed_line(&mut reader).unwrap(), "quit");
        assert_eq!(
            read_trimmed_line(&mut reader).unwrap_err().kind(),
            io::ErrorKind::UnexpectedEof
        );
    }
}
