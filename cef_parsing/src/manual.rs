/*!

This is the long-form manual for the Condorcet Election Format as read by
`cef_parsing` and `cefparse`.

## The format

A CEF file is plain UTF-8 text with one ballot expression per line. Blank
lines and lines starting with `#` are ignored.

```text
# A small election
Alice = Bob > Carol * 3
Carol > Alice ^ 2
absentee || /EMPTY_RANKING/
```

### Rankings

A ranking lists candidates from most to least preferred, separated by `>`.
Candidates tied at the same position are joined with `=`:

```text
Alice = Bob > Carol
```

means Alice and Bob are equally preferred, both strictly over Carol. A
candidate name is any run of words and numbers; whitespace inside a name is
allowed and collapses to single spaces (`John  Smith` and `John Smith` are
the same candidate). A candidate may appear only once per line.

A voter who expresses no preference is recorded with the explicit literal:

```text
/EMPTY_RANKING/
```

This is a deliberate statement, not an error, and such ballots are kept in
the output with an empty ranking.

### Multipliers

A line may end with up to two multipliers, in either order:

* `* n` — the quantifier: this line stands for n identical ballots;
* `^ n` — the weight: each of those ballots counts with weight n.

Both default to 1 and must be at least 1 when given. `Alice > Bob * 3 ^ 2`
is three ballots of weight two.

### Tags

Free-form labels may precede the ranking, separated from it by `||`:

```text
district 5, absentee || Alice > Bob
```

Tags are kept in order and passed through untouched; the format assigns them
no meaning.

## Error reporting

Each line is handled on its own. A malformed line is reported with its line
number and the failing stage (lexical, syntax or validation) and the rest of
the file is still processed. `cefparse` exits with a non-zero status when at
least one line was rejected.

*/
