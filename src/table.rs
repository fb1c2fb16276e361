use pad::PadStr;

/// Plain ascii table writer for list output. The first added row is treated
/// as the title row unless the table is headless.
pub struct Table {
    ncol: usize,
    rows: Vec<Vec<String>>,
    headless: bool,
}

impl Table {
    pub fn with_capacity(size: usize, headless: bool) -> Table {
        Table {
            ncol: 0,
            rows: Vec::with_capacity(size),
            headless,
        }
    }

    pub fn add(&mut self, row: Vec<String>) {
        if self.ncol == 0 {
            self.ncol = row.len();
            if self.headless {
                return;
            }
        } else if row.len() != self.ncol {
            panic!("unexpected row len");
        }
        self.rows.push(row);
    }

    pub fn show(self) {
        let mut widths = vec![0; self.ncol];
        for row in self.rows.iter() {
            for (coli, cell) in row.iter().enumerate() {
                let size = console::measure_text_width(cell);
                if size > widths[coli] {
                    widths[coli] = size;
                }
            }
        }

        let mut split = String::from("+");
        for width in widths.iter() {
            split.push_str(&"-".repeat(width + 2));
            split.push('+');
        }

        for (rowi, row) in self.rows.into_iter().enumerate() {
            if rowi == 0 {
                println!("{split}");
            }
            let mut line = String::from("|");
            for (coli, cell) in row.into_iter().enumerate() {
                let text = cell.pad_to_width_with_alignment(widths[coli], pad::Alignment::Left);
                line.push_str(&format!(" {text} |"));
            }
            println!("{line}");
            if rowi == 0 && !self.headless {
                println!("{split}");
            }
        }
        println!("{split}");
    }
}
